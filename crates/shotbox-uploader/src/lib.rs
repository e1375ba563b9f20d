//! Shotbox upload client.
//!
//! Delivers a captured image to the first backend that accepts it. Backends are
//! described declaratively ([`BackendDescriptor`]) and tried strictly in order
//! with a per-attempt timeout; when all of them fail the caller may keep the
//! capture locally through a [`LocalFallback`].

pub mod adapter;
pub mod descriptor;
pub mod fallback;
pub mod orchestrator;
pub mod response;
pub mod result;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use adapter::{BackendAdapter, HttpBackendAdapter};
pub use descriptor::{
    load_descriptors, resolve_descriptors, BackendDescriptor, DescriptorError, Handshake,
};
pub use fallback::{DirectoryFallback, FallbackError, LocalFallback};
pub use orchestrator::{UploadJob, UploadOrchestrator, UploadPolicy};
pub use response::{Locator, ResponseRule};
pub use result::{
    AggregateFailure, FailureCause, OrchestratorError, UploadAttemptResult, UploadFailure,
    UploadSuccess,
};
pub use session::{UploadSession, UploadStatus};
