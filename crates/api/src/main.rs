//! Playlist Bridge - YouTube to Spotify playlist translation server
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use playlist_bridge::utils::logging::init_tracing;
use playlist_bridge::{router, AppContext};
use playlist_bridge_infra::config;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging FIRST so configuration loading is visible
    init_tracing();

    let config = config::load().context("failed to load configuration")?;
    let bind_addr = config.server.bind_addr.clone();

    let ctx = Arc::new(AppContext::new(config).context("failed to build application context")?);
    let app = router(ctx);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "Playlist Bridge listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Playlist Bridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
