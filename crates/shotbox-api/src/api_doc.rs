//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers;
use shotbox_core::models;
use shotbox_infra::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shotbox Ingestion API",
        version = "0.1.0",
        description = "Receives captured images over multipart upload, verifies their type from content, and serves them back by generated filename."
    ),
    paths(
        handlers::upload::upload_file,
        handlers::uploads_get::get_upload,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::ImageKind,
            ErrorResponse,
            handlers::health::HealthCheckResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Image ingestion and retrieval"),
        (name = "health", description = "Service probes")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
