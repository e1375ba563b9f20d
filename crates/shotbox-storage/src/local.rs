use crate::traits::{ByteStream, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
///
/// Objects are written to a hidden temporary file inside the root and linked
/// into place once fully synced, so readers never observe a partial upload.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored uploads (created if missing)
    /// * `base_url` - Prefix for public URLs (e.g., "/uploads")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Keys are flat, so anything with a separator or a parent reference is
    /// rejected before it is joined onto the root.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.contains('/')
            || storage_key.contains('\\')
            || storage_key.starts_with('.')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    fn temp_path(&self, storage_key: &str) -> PathBuf {
        self.base_path
            .join(format!(".{}.{}.partial", storage_key, Uuid::new_v4().simple()))
    }

    async fn write_synced(path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    async fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create storage directory {}: {}",
                self.base_path.display(),
                e
            ))
        })
    }

    /// Link the synced temp file to its final name. Linking fails instead of
    /// replacing an existing target.
    async fn commit(&self, temp: &Path, target: &Path, storage_key: &str) -> StorageResult<()> {
        match fs::hard_link(temp, target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(StorageError::AlreadyExists(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::UploadFailed(format!(
                "Failed to move {} into place: {}",
                target.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let temp = self.temp_path(storage_key);
        let start = std::time::Instant::now();

        // The root may have been removed since startup.
        self.ensure_root().await?;

        let result = match Self::write_synced(&temp, &data).await {
            Ok(()) => self.commit(&temp, &path, storage_key).await,
            Err(e) => Err(e),
        };

        if let Err(cleanup) = fs::remove_file(&temp).await {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %temp.display(),
                    error = %cleanup,
                    "Failed to remove temporary upload file"
                );
            }
        }
        result?;

        let url = self.public_url(storage_key);

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            content_type = %content_type,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let key = storage_key.to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(key = %key, error = %e, "Local storage stream download error");
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }
}
