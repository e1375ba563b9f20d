//! Multipart extraction for the upload endpoint

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use shotbox_core::constants::UPLOAD_FIELD_NAME;
use shotbox_core::AppError;

/// File part as received, before any validation.
///
/// The declared name and content type are kept for logging only; nothing
/// downstream makes decisions from them.
#[derive(Debug, Clone)]
pub struct IncomingUpload {
    pub data: Vec<u8>,
    pub declared_filename: Option<String>,
    pub declared_content_type: Option<String>,
}

fn multipart_error(err: MultipartError, max: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge { max }
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

async fn read_limited(mut field: Field<'_>, max: usize) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max))?
    {
        if data.len() + chunk.len() > max {
            return Err(AppError::FileTooLarge { max });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Extract the single `file` part from a multipart body.
///
/// Reading stops as soon as the part grows past `max` bytes, so the declared
/// size of the request is never trusted. Plain text fields are skipped; a file
/// part under any other name, or a second `file` part, is rejected.
pub async fn extract_upload(
    mut multipart: Multipart,
    max: usize,
) -> Result<IncomingUpload, AppError> {
    let mut upload: Option<IncomingUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        if field_name != UPLOAD_FIELD_NAME {
            if field.file_name().is_some() {
                return Err(AppError::InvalidInput(format!(
                    "Unexpected file field '{}'; send the file as '{}'",
                    field_name, UPLOAD_FIELD_NAME
                )));
            }
            continue;
        }

        if upload.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple '{}' fields are not allowed",
                UPLOAD_FIELD_NAME
            )));
        }

        let declared_filename = field.file_name().map(str::to_string);
        let declared_content_type = field.content_type().map(str::to_string);
        let data = read_limited(field, max).await?;

        upload = Some(IncomingUpload {
            data,
            declared_filename,
            declared_content_type,
        });
    }

    upload.ok_or(AppError::NoFile)
}
