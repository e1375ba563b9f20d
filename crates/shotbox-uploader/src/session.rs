//! Capture-and-deliver context owned by the caller.

use anyhow::Context;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use shotbox_core::UploaderConfig;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapter::{BackendAdapter, HttpBackendAdapter};
use crate::descriptor::resolve_descriptors;
use crate::fallback::{DirectoryFallback, LocalFallback};
use crate::orchestrator::{UploadJob, UploadOrchestrator, UploadPolicy};
use crate::result::{OrchestratorError, UploadFailure, UploadSuccess};

/// What the user is shown after a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadStatus {
    Uploaded(UploadSuccess),
    SavedLocally {
        path: PathBuf,
        failures: Vec<UploadFailure>,
    },
    Failed {
        reason: String,
        failures: Vec<UploadFailure>,
    },
    /// Another delivery is still in flight.
    Busy,
    /// Nothing has been captured yet.
    NoCapture,
}

pub struct UploadSession {
    orchestrator: Arc<UploadOrchestrator>,
    fallback: Option<Arc<dyn LocalFallback>>,
    current: Mutex<Option<UploadJob>>,
}

impl UploadSession {
    pub fn new(
        orchestrator: Arc<UploadOrchestrator>,
        fallback: Option<Arc<dyn LocalFallback>>,
    ) -> Self {
        Self {
            orchestrator,
            fallback,
            current: Mutex::new(None),
        }
    }

    /// Build adapters, orchestrator and fallback from client configuration.
    pub fn from_config(config: &UploaderConfig, with_fallback: bool) -> anyhow::Result<Self> {
        let descriptors =
            resolve_descriptors(config).context("Failed to load upload backends")?;

        let client = Client::builder()
            .user_agent(concat!("shotbox/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let adapters: Vec<Arc<dyn BackendAdapter>> = descriptors
            .into_iter()
            .map(|d| Arc::new(HttpBackendAdapter::new(d, client.clone())) as Arc<dyn BackendAdapter>)
            .collect();

        let orchestrator = UploadOrchestrator::new(adapters, UploadPolicy::from(config))?;
        let fallback = with_fallback.then(|| {
            Arc::new(DirectoryFallback::new(config.fallback_dir.clone())) as Arc<dyn LocalFallback>
        });

        Ok(Self::new(Arc::new(orchestrator), fallback))
    }

    pub fn orchestrator(&self) -> &UploadOrchestrator {
        &self.orchestrator
    }

    /// Replace the current capture.
    pub fn capture(&self, data: impl Into<Bytes>, filename: impl Into<String>) {
        let job = UploadJob::new(data, filename);
        tracing::debug!(filename = %job.filename, size_bytes = job.data.len(), "Captured");
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(job);
    }

    pub fn current(&self) -> Option<UploadJob> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Deliver the current capture, falling back to local storage when every
    /// backend fails and a fallback is configured.
    pub async fn deliver(&self) -> UploadStatus {
        let Some(job) = self.current() else {
            return UploadStatus::NoCapture;
        };

        match self.orchestrator.upload(&job).await {
            Ok(success) => UploadStatus::Uploaded(success),
            Err(OrchestratorError::Busy) => UploadStatus::Busy,
            Err(OrchestratorError::Exhausted(aggregate)) => {
                let Some(fallback) = &self.fallback else {
                    return UploadStatus::Failed {
                        reason: aggregate.to_string(),
                        failures: aggregate.failures,
                    };
                };

                match fallback.save(&job).await {
                    Ok(path) => UploadStatus::SavedLocally {
                        path,
                        failures: aggregate.failures,
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "Local fallback failed");
                        UploadStatus::Failed {
                            reason: e.to_string(),
                            failures: aggregate.failures,
                        }
                    }
                }
            }
            Err(e @ OrchestratorError::NoBackends) => UploadStatus::Failed {
                reason: e.to_string(),
                failures: Vec::new(),
            },
        }
    }
}
