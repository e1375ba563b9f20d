use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::image::ImageKind;

/// Description of a persisted upload.
///
/// Only built after validation has passed. `kind` always comes from the
/// content bytes; the caller-declared content type never reaches this struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub kind: ImageKind,
    /// Generated storage key, `{uuid}.{ext}`.
    pub filename: String,
    pub size: usize,
    /// Public path the file is served from, e.g. `/uploads/{filename}`.
    pub url: String,
}

impl FileDescriptor {
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

/// Success body of `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub ok: bool,
    pub filename: String,
    pub url: String,
    pub size: usize,
    pub mime: String,
}

impl From<FileDescriptor> for UploadResponse {
    fn from(descriptor: FileDescriptor) -> Self {
        UploadResponse {
            ok: true,
            mime: descriptor.mime_type().to_string(),
            filename: descriptor.filename,
            url: descriptor.url,
            size: descriptor.size,
        }
    }
}
