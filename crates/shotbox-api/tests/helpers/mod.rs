//! Test helpers: build the router over a temporary upload root.
//!
//! Run from workspace root: `cargo test -p shotbox-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use shotbox_core::ServerConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test application: server plus the temp dir holding stored uploads.
pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
    pub upload_dir: PathBuf,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names of committed uploads (temporary files excluded).
    pub fn stored_files(&self) -> Vec<String> {
        list_visible(&self.upload_dir)
    }
}

fn list_visible(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.'))
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Setup test app with default limits (5 MiB ceiling).
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Setup test app with extra configuration overrides.
pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let temp_dir = tempfile::tempdir().unwrap();
    let upload_dir = temp_dir.path().join("uploads");

    let mut vars: HashMap<String, String> = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.insert(
        "UPLOAD_DIR".to_string(),
        upload_dir.to_string_lossy().into_owned(),
    );

    let config = ServerConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let (_state, router) = shotbox_api::setup::build_app(config).await.unwrap();

    TestApp {
        server: TestServer::new(router).unwrap(),
        _temp_dir: temp_dir,
        upload_dir,
    }
}
