//! Shotbox Core Library
//!
//! This crate provides the domain models, error types and configuration shared by the
//! ingestion service, the upload client and the command-line capture tool.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{ServerConfig, UploaderConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{FileDescriptor, ImageKind, UploadResponse};
