//! HTTP error response body
//!
//! Note: IntoResponse for AppError lives in shotbox-api because of the orphan rule:
//! axum's trait cannot be implemented for shotbox_core::AppError from this crate.

use serde::Serialize;
use utoipa::ToSchema;

/// Error body shared by every non-2xx JSON response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub ok: bool,
    /// Client-facing message, e.g. "no file" or "unsupported file type".
    pub error: String,
    /// Machine-readable code, e.g. "FILE_TOO_LARGE".
    pub code: String,
    /// Byte ceiling, present on size rejections only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
            code: code.into(),
            max: None,
        }
    }

    pub fn with_max(mut self, max: Option<usize>) -> Self {
        self.max = max;
        self
    }
}
