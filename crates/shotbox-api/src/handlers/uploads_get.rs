use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use futures::StreamExt;
use shotbox_core::{AppError, ImageKind};
use shotbox_infra::ErrorResponse;
use shotbox_storage::is_valid_storage_key;
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Serve a stored upload by its generated filename
#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    tag = "uploads",
    params(("filename" = String, Path, description = "Filename returned by POST /upload")),
    responses(
        (status = 200, description = "Stored file", content_type = "image/*"),
        (status = 404, description = "No such upload", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_upload"))]
pub async fn get_upload(
    Path(filename): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    if !is_valid_storage_key(&filename) {
        return Err(AppError::NotFound("Upload not found".to_string()).into());
    }

    let kind = filename
        .rsplit_once('.')
        .and_then(|(_, ext)| ImageKind::from_extension(ext))
        .ok_or_else(|| AppError::NotFound("Upload not found".to_string()))?;

    let stream = state.storage.download_stream(&filename).await?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, kind.mime_type())
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}
