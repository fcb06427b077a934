// Main entry point - Dependency injection and persistence server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use dashboard_builder::infrastructure::config::load_app_config;
use dashboard_builder::infrastructure::file_store::JsonFileStore;
use dashboard_builder::presentation::{AppState, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config().context("Failed to load server configuration")?;

    // Document store (infrastructure layer)
    let documents = JsonFileStore::open(&config.server.data_file)
        .await
        .with_context(|| format!("Failed to open {}", config.server.data_file))?;

    let state = Arc::new(AppState::new(Arc::new(documents)));
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting dashboard persistence service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
