//! Subject service HTTP server.
//!
//! Serves `GET /natal_chart?name=..&year=..&month=..&day=..&hour=..&minute=..&city=..`
//! where the city is resolved to coordinates and a time zone.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin subject-server
//!
//! # Online geocoding as a fallback for cities missing from the gazetteer
//! GEOCODER_PROVIDER=chain GEOCODER_API_KEY=... cargo run --bin subject-server
//! ```
//!
//! # Environment Variables
//!
//! - `ASTRO_CONFIG`: Path to a TOML config file (default: search for `astro.toml`)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `GEOCODER_PROVIDER`: `builtin`, `opencage` or `chain`
//! - `GEOCODER_API_KEY`: OpenCage API key
//! - `RUST_LOG`: Log level (default: info)

use tracing::info;

use astro_chart::config::ServerConfig;
use astro_chart::http::{create_subject_router, init_tracing, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting subject chart server");

    let config = ServerConfig::load()?;
    let geocoder = config.build_geocoder()?;
    info!(
        provider = %config.geocoder.provider,
        houses = %config.chart.subject_house_system,
        "Geocoder initialized"
    );

    let app = create_subject_router(geocoder, config.chart);
    serve(app, &config.bind_address()).await
}
