//! Natal service HTTP server.
//!
//! Serves `GET /natal_chart?year=..&month=..&day=..&hour=..&minute=..&lon=..&lat=..&tz=..`
//! with `lon` west positive and `tz` in hours east of UTC.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin natal-server
//! PORT=9090 RUST_LOG=debug cargo run --bin natal-server
//! ```
//!
//! # Environment Variables
//!
//! - `ASTRO_CONFIG`: Path to a TOML config file (default: search for `astro.toml`)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use tracing::info;

use astro_chart::config::ServerConfig;
use astro_chart::http::{create_natal_router, init_tracing, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting natal chart server");

    let config = ServerConfig::load()?;
    info!(houses = %config.chart.natal_house_system, "Configuration loaded");

    let app = create_natal_router(config.chart);
    serve(app, &config.bind_address()).await
}
