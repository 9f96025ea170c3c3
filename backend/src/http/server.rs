//! Process setup shared by both server binaries.

use axum::Router;
use std::env;
use std::net::SocketAddr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Install the global fmt subscriber. Level comes from `RUST_LOG`
/// (`trace` .. `error`), default INFO.
pub fn init_tracing() {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

/// Bind `address` and serve `app` until the process is stopped.
pub async fn serve(app: Router, address: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = address.parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
