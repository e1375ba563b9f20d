use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use shotbox_core::{AppError, UploadResponse};
use shotbox_infra::ErrorResponse;
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_upload;

/// Upload a captured image
///
/// Accepts one multipart part named `file`. The stored type is decided from the
/// content bytes; the part's declared content type and filename are ignored.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file, unsupported type or malformed body", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    // A body that is not multipart at all carries no file part.
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(rejection = %rejection, "Upload without a multipart body");
        AppError::NoFile
    })?;

    let upload = extract_upload(multipart, state.max_file_size()).await?;
    let descriptor = state.ingestion.ingest(upload).await?;

    Ok(Json(UploadResponse::from(descriptor)))
}
