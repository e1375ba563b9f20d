//! Health check handlers and response types.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub storage: String,
}

async fn check_upload_dir(state: &AppState) -> Result<(), String> {
    let metadata = tokio::fs::metadata(&state.config.upload_dir)
        .await
        .map_err(|e| e.to_string())?;
    if !metadata.is_dir() {
        return Err("upload root is not a directory".to_string());
    }

    // Mode bits alone do not prove writability; create and remove a hidden file.
    let marker = state
        .config
        .upload_dir
        .join(format!(".health-check-{}", uuid::Uuid::new_v4().simple()));
    tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&marker)
        .await
        .map_err(|e| format!("upload root is not writable: {}", e))?;
    tokio::fs::remove_file(&marker)
        .await
        .map_err(|e| format!("failed to clean up health check file: {}", e))?;
    Ok(())
}

/// Readiness: the storage root exists and is writable.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy", body = HealthCheckResponse),
        (status = 503, description = "Storage unavailable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let storage = match tokio::time::timeout(TIMEOUT, check_upload_dir(&state)).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Storage health check failed");
            format!("unhealthy: {}", e)
        }
        Err(_) => "timeout".to_string(),
    };

    let healthy = storage == "healthy";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthCheckResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            storage,
        }),
    )
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}
