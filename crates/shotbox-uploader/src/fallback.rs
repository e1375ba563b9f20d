//! Local persistence used when no backend accepted a capture.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::orchestrator::UploadJob;

const DEFAULT_EXTENSION: &str = "png";
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("failed to save capture to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no free capture filename in {0}")]
    NoFreeName(PathBuf),
}

#[async_trait]
pub trait LocalFallback: Send + Sync {
    /// Persist the job and return where it was written.
    async fn save(&self, job: &UploadJob) -> Result<PathBuf, FallbackError>;
}

/// Writes captures into a directory as `capture_<unix-millis>.<ext>`.
#[derive(Debug, Clone)]
pub struct DirectoryFallback {
    dir: PathBuf,
}

impl DirectoryFallback {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn candidate(&self, millis: i64, extension: &str, attempt: u32) -> PathBuf {
        let name = if attempt == 0 {
            format!("capture_{}.{}", millis, extension)
        } else {
            format!("capture_{}_{}.{}", millis, attempt, extension)
        };
        self.dir.join(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> FallbackError {
        FallbackError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl LocalFallback for DirectoryFallback {
    async fn save(&self, job: &UploadJob) -> Result<PathBuf, FallbackError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Self::io_error(&self.dir, e))?;

        let extension = shotbox_processing::sniff(&job.data)
            .map(|kind| kind.extension())
            .unwrap_or(DEFAULT_EXTENSION);
        let millis = chrono::Utc::now().timestamp_millis();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.candidate(millis, extension, attempt);
            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(Self::io_error(&path, e)),
            };

            file.write_all(&job.data)
                .await
                .map_err(|e| Self::io_error(&path, e))?;
            file.sync_all()
                .await
                .map_err(|e| Self::io_error(&path, e))?;

            tracing::info!(
                path = %path.display(),
                size_bytes = job.data.len(),
                "Capture saved locally"
            );
            return Ok(path);
        }

        Err(FallbackError::NoFreeName(self.dir.clone()))
    }
}
