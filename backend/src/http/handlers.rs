//! HTTP handlers for the REST API.
//!
//! Each handler reads the query string, delegates to the service layer, and
//! maps failures onto [`AppError`]. Chart computation is CPU-bound and runs
//! on the blocking pool.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::collections::HashMap;
use tracing::{info, warn};

use super::dto::{HealthResponse, QueryParams};
use super::error::AppError;
use super::state::AppState;
use crate::services::{self, AstrologicalSubject, NatalChart};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

type RawQuery = Result<Query<HashMap<String, String>>, QueryRejection>;

fn query_map(query: RawQuery) -> Result<HashMap<String, String>, AppError> {
    query
        .map(|Query(map)| map)
        .map_err(|e| AppError::InvalidInput(e.body_text()))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /
pub async fn root() -> &'static str {
    "Astro API is running!"
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        service: state.service.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

// =============================================================================
// Chart Endpoints
// =============================================================================

/// GET /natal_chart (natal service)
///
/// Chart from explicit `lon` (west positive), `lat` and `tz` offset.
pub async fn natal_chart(
    State(state): State<AppState>,
    query: RawQuery,
) -> HandlerResult<NatalChart> {
    let params = query_map(query)?;
    let request = QueryParams::new(&params).natal_request(state.chart.natal_house_system)?;

    let chart = tokio::task::spawn_blocking(move || services::natal_chart(&request))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    info!(
        utc = %chart.info.utc,
        system = %chart.info.house_system,
        "Natal chart computed"
    );
    Ok(Json(chart))
}

/// GET /natal_chart (subject service)
///
/// Resolves `city` (and optional `nation`) before computing the subject.
pub async fn subject_chart(
    State(state): State<AppState>,
    query: RawQuery,
) -> HandlerResult<AstrologicalSubject> {
    let params = query_map(query)?;
    let request = QueryParams::new(&params).subject_request(state.chart.subject_house_system)?;

    let geocoder = state
        .geocoder
        .as_ref()
        .ok_or_else(|| AppError::Internal("No geocoder configured".to_string()))?;
    let location = geocoder
        .resolve(&request.city, request.nation.as_deref())
        .await
        .map_err(|e| {
            warn!(city = %request.city, "Geocoding failed: {}", e);
            AppError::from(e)
        })?;

    let subject = tokio::task::spawn_blocking(move || services::compute_subject(&request, &location))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(subject))
}
