//! Configuration validation
//!
//! Startup checks beyond `ServerConfig::validate`, catching settings that are legal
//! but almost certainly wrong.

use anyhow::Result;
use shotbox_core::ServerConfig;

const LARGE_UPLOAD_WARNING_BYTES: usize = 100 * 1024 * 1024;

/// Validate critical configuration values
pub fn validate_config(config: &ServerConfig) -> Result<()> {
    config.validate()?;

    if config.max_file_size_bytes > LARGE_UPLOAD_WARNING_BYTES {
        tracing::warn!(
            max_file_size_bytes = config.max_file_size_bytes,
            "MAX_FILE_SIZE_MB is very high - every upload is buffered in memory"
        );
    }

    if config.is_production() && config.upload_dir.is_relative() {
        tracing::warn!(
            upload_dir = %config.upload_dir.display(),
            "UPLOAD_DIR is relative in production - it resolves against the working directory"
        );
    }

    if config.public_path_prefix == "/upload" {
        return Err(anyhow::anyhow!(
            "PUBLIC_PATH_PREFIX cannot be '/upload'; that path receives uploads"
        ));
    }

    Ok(())
}
