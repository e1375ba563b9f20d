//! Shotbox API Library
//!
//! The ingestion service: HTTP handlers, the upload pipeline and application setup.

// Module declarations
mod api_doc;
mod handlers;
pub mod services;
pub mod setup;
pub mod utils;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use services::ingestion::IngestionService;
pub use state::AppState;
