use serde::Serialize;
use shotbox_uploader::{BackendDescriptor, UploadStatus};
use std::path::Path;

/// Filename sent to backends when the path has none.
pub const DEFAULT_CAPTURE_NAME: &str = "capture.png";

/// One row of `shotbox backends`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendSummary {
    pub priority: usize,
    pub name: String,
    pub endpoint: String,
    pub handshake: bool,
    pub retention: Option<String>,
}

/// Summaries in priority order (1 is tried first). Headers are left out.
pub fn backend_summaries(descriptors: &[BackendDescriptor]) -> Vec<BackendSummary> {
    descriptors
        .iter()
        .enumerate()
        .map(|(index, d)| BackendSummary {
            priority: index + 1,
            name: d.name.clone(),
            endpoint: d.endpoint.clone(),
            handshake: d.handshake.is_some(),
            retention: d.retention.clone(),
        })
        .collect()
}

pub fn capture_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_CAPTURE_NAME.to_string())
}

/// Process exit code for a delivery outcome.
pub fn exit_code(status: &UploadStatus) -> i32 {
    match status {
        UploadStatus::Uploaded(_) => 0,
        UploadStatus::SavedLocally { .. } => 2,
        UploadStatus::Failed { .. } | UploadStatus::Busy | UploadStatus::NoCapture => 1,
    }
}

/// Initialize tracing for the CLI. Logs go to stderr; stdout carries JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotbox_uploader::UploadSuccess;
    use std::path::PathBuf;

    #[test]
    fn capture_name_from_path() {
        assert_eq!(capture_name(Path::new("/tmp/shot.jpg")), "shot.jpg");
        assert_eq!(capture_name(Path::new("/")), DEFAULT_CAPTURE_NAME);
    }

    #[test]
    fn summaries_follow_priority() {
        let mut second = BackendDescriptor::local_server("http://backup:3000");
        second.name = "backup".to_string();
        second.retention = Some("7 days".to_string());
        let descriptors = vec![BackendDescriptor::local_server("http://localhost:3000"), second];

        let summaries = backend_summaries(&descriptors);
        assert_eq!(summaries[0].priority, 1);
        assert_eq!(summaries[0].name, "local");
        assert_eq!(summaries[1].priority, 2);
        assert_eq!(summaries[1].endpoint, "http://backup:3000/upload");
        assert_eq!(summaries[1].retention.as_deref(), Some("7 days"));
    }

    #[test]
    fn exit_codes() {
        let uploaded = UploadStatus::Uploaded(UploadSuccess {
            location: "http://h/u/a.png".to_string(),
            direct_link: "http://h/u/a.png".to_string(),
            ttl_hint: None,
            service_name: "local".to_string(),
        });
        assert_eq!(exit_code(&uploaded), 0);
        assert_eq!(
            exit_code(&UploadStatus::SavedLocally {
                path: PathBuf::from("captures/capture_1.png"),
                failures: Vec::new(),
            }),
            2
        );
        assert_eq!(exit_code(&UploadStatus::Busy), 1);
    }
}
