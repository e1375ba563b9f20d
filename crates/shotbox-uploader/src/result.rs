//! Normalized outcomes of upload attempts.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// A backend accepted the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSuccess {
    /// Page or URL the service reports for the upload.
    pub location: String,
    /// URL serving the raw file. Equal to `location` when the service reports only one.
    pub direct_link: String,
    /// Advertised retention, e.g. "72 hours".
    pub ttl_hint: Option<String>,
    pub service_name: String,
}

/// Why a single attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureCause {
    #[error("timeout")]
    Timeout,

    #[error("http status {0}")]
    HttpStatus(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("handshake failed: {0}")]
    Handshake(String),
}

impl Serialize for FailureCause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{service_name}: {cause}")]
pub struct UploadFailure {
    pub service_name: String,
    pub cause: FailureCause,
}

impl UploadFailure {
    pub fn new(service_name: impl Into<String>, cause: FailureCause) -> Self {
        Self {
            service_name: service_name.into(),
            cause,
        }
    }
}

/// Outcome of one backend attempt. Adapters always settle to one of the two shapes.
pub type UploadAttemptResult = Result<UploadSuccess, UploadFailure>;

/// Every backend failed. Failures are kept in attempt order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateFailure {
    pub failures: Vec<UploadFailure>,
}

impl std::fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "all {} upload backends failed", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("an upload is already in progress")]
    Busy,

    #[error(transparent)]
    Exhausted(#[from] AggregateFailure),

    #[error("no upload backends configured")]
    NoBackends,
}
