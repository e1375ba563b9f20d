//! Upload ingestion pipeline
//!
//! size check → sniff → key generation → atomic write → descriptor

use bytes::Bytes;
use shotbox_core::{AppError, FileDescriptor};
use shotbox_processing::UploadValidator;
use shotbox_storage::{generate_storage_key, Storage, StorageError};
use std::sync::Arc;

use crate::utils::upload::IncomingUpload;

/// Fresh keys tried before giving up on a write that keeps colliding.
const MAX_KEY_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct IngestionService {
    storage: Arc<dyn Storage>,
    validator: UploadValidator,
}

impl IngestionService {
    pub fn new(storage: Arc<dyn Storage>, validator: UploadValidator) -> Self {
        Self { storage, validator }
    }

    /// Validate and persist an upload, returning its descriptor.
    ///
    /// Nothing is written unless both the size and type checks pass.
    #[tracing::instrument(
        skip(self, upload),
        fields(
            size = upload.data.len(),
            declared_type = upload.declared_content_type.as_deref().unwrap_or("none"),
        )
    )]
    pub async fn ingest(&self, upload: IncomingUpload) -> Result<FileDescriptor, AppError> {
        self.validator.validate_size(upload.data.len())?;
        let kind = self.validator.sniff_allowed(&upload.data)?;

        let size = upload.data.len();
        let data = Bytes::from(upload.data);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let key = generate_storage_key(kind);

            match self
                .storage
                .upload(&key, kind.mime_type(), data.clone())
                .await
            {
                Ok(url) => {
                    tracing::info!(
                        filename = %key,
                        mime = kind.mime_type(),
                        size,
                        "Upload stored"
                    );
                    return Ok(FileDescriptor {
                        kind,
                        filename: key,
                        size,
                        url,
                    });
                }
                Err(StorageError::AlreadyExists(existing)) if attempts < MAX_KEY_ATTEMPTS => {
                    tracing::warn!(key = %existing, "Storage key collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
