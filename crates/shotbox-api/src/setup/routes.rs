//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use shotbox_core::ServerConfig;
use shotbox_infra::{
    request_id_middleware, security_headers_middleware, RequestIdSpan, SecurityHeaders,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &ServerConfig, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let uploads_path = format!("{}/{{filename}}", config.public_path_prefix);

    let routes = Router::new()
        .route("/upload", post(handlers::upload::upload_file))
        .route(&uploads_path, get(handlers::uploads_get::get_upload))
        .route("/health", get(handlers::health::health_check))
        .route("/live", get(handlers::health::liveness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        );

    // Multipart reads past this limit fail with 413, which the upload
    // extractor reports as "file too large". It sits above the file ceiling so
    // the streaming per-part check normally fires first.
    let body_limit = config.request_body_limit();

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        body_limit,
        max_file_size_bytes = config.max_file_size_bytes,
        "HTTP limits configured"
    );

    // The docs page loads RapiDoc from a CDN, so it stays outside the
    // locked-down CSP applied to the API routes.
    let app = routes
        .layer(axum::middleware::from_fn_with_state(
            SecurityHeaders {
                hsts: config.is_production(),
            },
            security_headers_middleware,
        ))
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(RequestIdSpan))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &ServerConfig) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
