use axum::extract::State;
use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};

/// Settings for [`security_headers_middleware`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SecurityHeaders {
    /// Send HSTS. Only enable behind HTTPS.
    pub hsts: bool,
}

/// Security headers middleware
///
/// Install with `axum::middleware::from_fn_with_state(SecurityHeaders { .. }, ..)`.
pub async fn security_headers_middleware(
    State(settings): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    // Stored uploads are served as-is; browsers must not reinterpret them.
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if settings.hsts {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("default-src 'none'; img-src 'self'; frame-ancestors 'none'"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use axum_test::TestServer;

    fn app(settings: SecurityHeaders) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                settings,
                security_headers_middleware,
            ))
    }

    #[tokio::test]
    async fn test_headers_present() {
        let server = TestServer::new(app(SecurityHeaders::default())).unwrap();
        let response = server.get("/").await;

        assert_eq!(response.header("X-Content-Type-Options"), "nosniff");
        assert_eq!(response.header("X-Frame-Options"), "DENY");
        assert!(response.maybe_header("Strict-Transport-Security").is_none());
    }

    #[tokio::test]
    async fn test_hsts_when_enabled() {
        let server = TestServer::new(app(SecurityHeaders { hsts: true })).unwrap();
        let response = server.get("/").await;

        assert!(response.maybe_header("Strict-Transport-Security").is_some());
    }
}
