//! HTTP error handling and response types.
//!
//! Three tiers, each rendered as `{"error": "..."}`: bad query parameters
//! and failed chart computations are client errors (400); anything else,
//! including a panic inside a handler, is a 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use tracing::{error, warn};

use crate::error::ChartError;
use crate::geocoding::GeocodeError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed query parameter
    InvalidInput(String),
    /// The chart could not be computed for these inputs
    Calculation(ChartError),
    /// Internal server error
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::Calculation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input parameters: {}", msg),
            AppError::Calculation(e) => write!(f, "Astrology calculation error: {}", e),
            AppError::Internal(msg) => write!(f, "An unexpected error occurred: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!("{}", message);
        } else {
            warn!("{}", message);
        }
        (status, Json(ApiError { error: message })).into_response()
    }
}

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        AppError::Calculation(err)
    }
}

impl From<GeocodeError> for AppError {
    fn from(err: GeocodeError) -> Self {
        AppError::Calculation(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Response for a panic caught by `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    AppError::Internal(detail).into_response()
}
