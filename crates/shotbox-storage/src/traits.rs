//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use shotbox_core::AppError;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Storage key already in use: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("File not found: {}", key)),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage abstraction trait
///
/// Writes are all-or-nothing: once `upload` returns `Ok`, the object is fully
/// readable under its key, and on error no partial object is visible.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `data` under `storage_key` and return its public URL.
    ///
    /// Fails with [`StorageError::AlreadyExists`] rather than overwriting.
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String>;

    /// Download a file as a stream of `Bytes` chunks
    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream>;

    /// Public URL for a key, whether or not it exists yet.
    fn public_url(&self, storage_key: &str) -> String;
}
