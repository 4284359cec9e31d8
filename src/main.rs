mod api;
mod app_state;
mod core;
mod domain;
mod errors;
mod logging;
mod routes;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::app_state::build_app_state;
use crate::core::config::app_config;
use crate::routes::app_router;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cfg = app_config();
    let _log_guard = logging::init(cfg)?;

    info!("Starting clustuse-core v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Data dir: {:?}, reqgres GPU parsing: {}",
        cfg.data_dir, cfg.gpu_reqgres_enabled
    );

    let app = app_router().with_state(build_app_state());

    let listener = TcpListener::bind(cfg.server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.server_addr))?;
    info!("Listening on http://{}", cfg.server_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
