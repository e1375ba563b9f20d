//! In-process adapters with scripted behaviour.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::adapter::BackendAdapter;
use crate::orchestrator::UploadJob;
use crate::result::{FailureCause, UploadAttemptResult, UploadFailure, UploadSuccess};

pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];

pub fn job() -> UploadJob {
    UploadJob::new(Bytes::from_static(PNG), "capture.png")
}

pub enum Script {
    Succeed,
    Fail(FailureCause),
    /// Never settles.
    Hang,
    /// Succeeds once the gate is notified.
    WaitFor(Arc<Notify>),
}

pub struct ScriptedAdapter {
    name: String,
    script: Script,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedAdapter {
    pub fn shared(
        name: &str,
        script: Script,
        calls: &Arc<Mutex<Vec<String>>>,
    ) -> Arc<dyn BackendAdapter> {
        Arc::new(Self {
            name: name.to_string(),
            script,
            calls: calls.clone(),
        })
    }

    fn success(&self) -> UploadSuccess {
        UploadSuccess {
            location: format!("https://{}.example/f", self.name),
            direct_link: format!("https://{}.example/f.png", self.name),
            ttl_hint: None,
            service_name: self.name.clone(),
        }
    }
}

#[async_trait]
impl BackendAdapter for ScriptedAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn submit(&self, _data: Bytes, _filename: &str) -> UploadAttemptResult {
        self.calls.lock().unwrap().push(self.name.clone());

        match &self.script {
            Script::Succeed => Ok(self.success()),
            Script::Fail(cause) => Err(UploadFailure::new(self.name.clone(), cause.clone())),
            Script::Hang => std::future::pending().await,
            Script::WaitFor(gate) => {
                gate.notified().await;
                Ok(self.success())
            }
        }
    }
}
