//! Retrieval, health and documentation endpoint tests.

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{fixtures, setup_test_app, setup_test_app_with};

#[tokio::test]
async fn test_uploaded_file_is_served_back() {
    let app = setup_test_app().await;

    let data = fixtures::gif_bytes();
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(data.clone()).file_name("anim.gif"),
    );
    let upload: serde_json::Value = app.client().post("/upload").multipart(form).await.json();
    let url = upload["url"].as_str().unwrap();

    let response = app.client().get(url).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "image/gif");
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.as_bytes().to_vec(), data);
}

#[tokio::test]
async fn test_custom_public_prefix() {
    let app = setup_test_app_with(&[("PUBLIC_PATH_PREFIX", "/files/")]).await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(fixtures::png_bytes()).file_name("a.png"),
    );
    let upload: serde_json::Value = app.client().post("/upload").multipart(form).await.json();
    let url = upload["url"].as_str().unwrap();
    assert!(url.starts_with("/files/"));

    assert_eq!(app.client().get(url).await.status_code(), 200);
}

#[tokio::test]
async fn test_unknown_or_malformed_names_are_not_found() {
    let app = setup_test_app().await;

    let missing = app
        .client()
        .get("/uploads/6f1c2d1e-9a7b-4c1e-8f3a-2b6d9e0c4a51.png")
        .await;
    assert_eq!(missing.status_code(), 404);
    let body: serde_json::Value = missing.json();
    assert_eq!(body["code"], "NOT_FOUND");

    assert_eq!(app.client().get("/uploads/passwd").await.status_code(), 404);
    assert_eq!(
        app.client().get("/uploads/..%2F..%2Fetc%2Fpasswd").await.status_code(),
        404
    );
}

#[tokio::test]
async fn test_health_and_liveness() {
    let app = setup_test_app().await;

    let health = app.client().get("/health").await;
    assert_eq!(health.status_code(), 200);
    let body: serde_json::Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "healthy");

    let live = app.client().get("/live").await;
    assert_eq!(live.status_code(), 200);
    assert!(live.maybe_header("x-request-id").is_some());
}

#[tokio::test]
async fn test_health_reports_missing_upload_root() {
    let app = setup_test_app().await;
    std::fs::remove_dir_all(&app.upload_dir).unwrap();

    let health = app.client().get("/health").await;
    assert_eq!(health.status_code(), 503);
}

#[tokio::test]
async fn test_health_check_leaves_no_files_behind() {
    let app = setup_test_app().await;

    let health = app.client().get("/health").await;
    assert_eq!(health.status_code(), 200);
    assert_eq!(std::fs::read_dir(&app.upload_dir).unwrap().count(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_health_reports_unwritable_upload_root() {
    use std::os::unix::fs::PermissionsExt;

    let app = setup_test_app().await;
    std::fs::set_permissions(&app.upload_dir, std::fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users ignore mode bits; nothing to check then.
    let sentinel = app.upload_dir.join(".writable");
    let writable = std::fs::write(&sentinel, b"").is_ok();
    if !writable {
        let health = app.client().get("/health").await;
        assert_eq!(health.status_code(), 503);
        let body: serde_json::Value = health.json();
        assert!(body["storage"].as_str().unwrap().contains("not writable"));
    } else {
        std::fs::remove_file(&sentinel).unwrap();
    }

    std::fs::set_permissions(&app.upload_dir, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[tokio::test]
async fn test_openapi_document_lists_upload() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let spec: serde_json::Value = response.json();
    assert!(spec["paths"].get("/upload").is_some());
}

#[tokio::test]
async fn test_docs_page_is_not_blocked_by_api_csp() {
    let app = setup_test_app().await;

    let docs = app.client().get("/docs").await;
    assert_eq!(docs.status_code(), 200);
    assert!(docs.text().contains("rapidoc"));
    let csp = docs
        .maybe_header("content-security-policy")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    assert!(!csp.contains("default-src 'none'"), "{}", csp);
    assert!(docs.maybe_header("x-request-id").is_some());

    let health = app.client().get("/health").await;
    assert_eq!(
        health.header("content-security-policy"),
        "default-src 'none'; img-src 'self'; frame-ancestors 'none'"
    );
}
