//! Application setup and initialization
//!
//! Everything `main` needs to turn a `ServerConfig` into a running router.

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use shotbox_core::ServerConfig;
use shotbox_infra::TelemetryOptions;
use std::sync::Arc;

/// Initialize the entire application, including tracing
pub async fn initialize_app(config: ServerConfig) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    shotbox_infra::init_telemetry(
        &TelemetryOptions::new("shotbox-api", "shotbox=debug,tower_http=debug")
            .json(config.log_json),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    build_app(config).await
}

/// Build state and router without touching global tracing state.
pub async fn build_app(config: ServerConfig) -> Result<(Arc<AppState>, axum::Router)> {
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), storage));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
