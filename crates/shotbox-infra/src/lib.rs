//! Shotbox Infrastructure Library
//!
//! Shared infrastructure for the ingestion service and the CLI:
//! - Middleware (request ID, security headers)
//! - Tracing initialization
//! - HTTP error response body

pub mod error;
pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use error::ErrorResponse;
pub use middleware::{
    request_id_middleware, security_headers_middleware, RequestId, RequestIdSpan,
    SecurityHeaders,
};
pub use telemetry::{init_telemetry, shutdown_telemetry, TelemetryOptions};
