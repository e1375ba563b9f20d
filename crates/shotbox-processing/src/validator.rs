use shotbox_core::{AppError, ImageKind};

use crate::sniff::{detected_mime, sniff};

/// Validation errors for incoming uploads
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Unsupported file type (detected: {})", detected.unwrap_or("unknown"))]
    UnsupportedType { detected: Option<&'static str> },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { max, .. } => AppError::FileTooLarge { max },
            ValidationError::UnsupportedType { detected } => AppError::UnsupportedFileType {
                detected: detected.map(str::to_string),
            },
        }
    }
}

/// Upload validator
///
/// Applies the byte ceiling and the image allow-list. Type decisions are made
/// from content only.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    /// Validate file size. A size equal to the ceiling is accepted.
    pub fn validate_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Sniff `bytes` and return the kind if it is one of [`ImageKind::ALL`].
    pub fn sniff_allowed(&self, bytes: &[u8]) -> Result<ImageKind, ValidationError> {
        match sniff(bytes) {
            Some(kind) => Ok(kind),
            None => {
                let detected = detected_mime(bytes);
                tracing::debug!(
                    detected = detected.unwrap_or("unknown"),
                    size = bytes.len(),
                    "Rejected upload with unsupported content"
                );
                Err(ValidationError::UnsupportedType { detected })
            }
        }
    }
}
