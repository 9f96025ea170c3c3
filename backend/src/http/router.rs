//! Router configuration for the HTTP API.
//!
//! Both services expose the same three paths; only the `/natal_chart`
//! handler differs.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::error::panic_response;
use super::handlers;
use super::state::{AppState, ServiceKind};
use crate::config::ChartSettings;
use crate::geocoding::Geocoder;

/// Create the application router for the service named in `state`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let chart = match state.service {
        ServiceKind::Subject => get(handlers::subject_chart),
        ServiceKind::Natal => get(handlers::natal_chart),
    };

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/natal_chart", chart)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Router for the city-based subject service.
pub fn create_subject_router(geocoder: Arc<dyn Geocoder>, chart: ChartSettings) -> Router {
    create_router(AppState::subject(geocoder, chart))
}

/// Router for the coordinate-based natal service.
pub fn create_natal_router(chart: ChartSettings) -> Router {
    create_router(AppState::natal(chart))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::Gazetteer;

    #[test]
    fn test_router_creation() {
        let _subject = create_subject_router(Arc::new(Gazetteer::new()), ChartSettings::default());
        let _natal = create_natal_router(ChartSettings::default());
    }
}
