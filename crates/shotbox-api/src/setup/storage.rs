//! Storage setup and initialization

use anyhow::{Context, Result};
use shotbox_core::ServerConfig;
use shotbox_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Create the upload root (if missing) and the storage backend over it.
pub async fn setup_storage(config: &ServerConfig) -> Result<Arc<dyn Storage>> {
    let storage = LocalStorage::new(&config.upload_dir, config.public_path_prefix.clone())
        .await
        .with_context(|| {
            format!(
                "Failed to initialize upload directory {}",
                config.upload_dir.display()
            )
        })?;

    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        public_path_prefix = %config.public_path_prefix,
        "Local storage initialized"
    );

    Ok(Arc::new(storage))
}
