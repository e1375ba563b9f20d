//! Error types module
//!
//! All ingestion-side failures are unified under [`AppError`]. Each variant describes
//! its own HTTP presentation through [`ErrorMetadata`], so handlers never pick status
//! codes by hand.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details must be hidden from the client
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file field in request")]
    NoFile,

    #[error("Unsupported file type (detected: {})", detected.as_deref().unwrap_or("unknown"))]
    UnsupportedFileType { detected: Option<String> },

    #[error("File too large: exceeds {max} bytes")]
    FileTooLarge { max: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::NoFile => (400, "NO_FILE", false, LogLevel::Debug),
        AppError::UnsupportedFileType { .. } => {
            (400, "UNSUPPORTED_FILE_TYPE", false, LogLevel::Debug)
        }
        AppError::FileTooLarge { .. } => (413, "FILE_TOO_LARGE", false, LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Storage(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for log fields
    pub fn error_type(&self) -> &str {
        match self {
            AppError::NoFile => "ValidationError",
            AppError::UnsupportedFileType { .. } => "UnsupportedTypeError",
            AppError::FileTooLarge { .. } => "SizeLimitError",
            AppError::InvalidInput(_) => "ValidationError",
            AppError::NotFound(_) => "NotFound",
            AppError::Storage(_) => "InternalError",
            AppError::Internal(_) => "InternalError",
            AppError::InternalWithSource { .. } => "InternalError",
        }
    }

    /// Ceiling reported alongside a size rejection.
    pub fn max_bytes(&self) -> Option<usize> {
        match self {
            AppError::FileTooLarge { max } => Some(*max),
            _ => None,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::NoFile => "no file".to_string(),
            AppError::UnsupportedFileType { .. } => "unsupported file type".to_string(),
            AppError::FileTooLarge { .. } => "file too large".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Storage(_) => "internal server error".to_string(),
            AppError::Internal(_) => "internal server error".to_string(),
            AppError::InternalWithSource { .. } => "internal server error".to_string(),
        }
    }
}
