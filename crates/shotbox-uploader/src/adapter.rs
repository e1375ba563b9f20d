//! Backend adapters: one uniform submit contract over each upload service.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde_json::Value;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::descriptor::{BackendDescriptor, Handshake, NODE_PLACEHOLDER};
use crate::result::{FailureCause, UploadAttemptResult, UploadFailure, UploadSuccess};

/// Anything that can take a binary file and hand back a locator.
///
/// Implementations must settle every call to success or failure; transport
/// errors and unexpected replies are failures, never panics.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    fn name(&self) -> &str;

    async fn submit(&self, data: Bytes, filename: &str) -> UploadAttemptResult;
}

/// Adapter driven entirely by a [`BackendDescriptor`].
pub struct HttpBackendAdapter {
    descriptor: BackendDescriptor,
    client: Client,
}

impl Debug for HttpBackendAdapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // headers may hold credentials
        f.debug_struct("HttpBackendAdapter")
            .field("name", &self.descriptor.name)
            .field("endpoint", &self.descriptor.endpoint)
            .finish()
    }
}

impl HttpBackendAdapter {
    pub fn new(descriptor: BackendDescriptor, client: Client) -> Self {
        Self { descriptor, client }
    }

    async fn resolve_endpoint(&self) -> Result<Url, FailureCause> {
        let endpoint = match &self.descriptor.handshake {
            Some(handshake) => {
                let node = self.handshake(handshake).await?;
                self.descriptor.endpoint.replace(NODE_PLACEHOLDER, &node)
            }
            None => self.descriptor.endpoint.clone(),
        };

        Url::parse(&endpoint)
            .map_err(|e| FailureCause::Transport(format!("invalid endpoint: {}", e)))
    }

    /// Ask the service which node should receive the upload.
    async fn handshake(&self, handshake: &Handshake) -> Result<String, FailureCause> {
        let response = self
            .client
            .get(&handshake.url)
            .send()
            .await
            .map_err(|e| FailureCause::Handshake(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FailureCause::Handshake(format!("http status {}", status.as_u16())));
        }

        let document: Value = response
            .json()
            .await
            .map_err(|_| FailureCause::Handshake("response is not JSON".to_string()))?;

        let node = document
            .pointer(&handshake.node_pointer)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                FailureCause::Handshake(format!("{} missing", handshake.node_pointer))
            })?;

        // the node is spliced into a URL
        let valid = !node.is_empty()
            && node
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(FailureCause::Handshake(format!(
                "unusable upload node '{}'",
                node
            )));
        }

        tracing::debug!(backend = %self.descriptor.name, node = %node, "Handshake resolved upload node");
        Ok(node.to_string())
    }

    fn build_form(&self, data: Bytes, filename: &str) -> Result<Form, FailureCause> {
        let mime = shotbox_processing::sniff(&data)
            .map(|kind| kind.mime_type())
            .unwrap_or("application/octet-stream");

        let part = Part::bytes(data.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime)
            .map_err(|e| FailureCause::Transport(e.to_string()))?;

        let form = self
            .descriptor
            .fields
            .iter()
            .fold(Form::new(), |form, (key, value)| {
                form.text(key.clone(), value.clone())
            });

        Ok(form.part(self.descriptor.file_field.clone(), part))
    }

    async fn try_submit(&self, data: Bytes, filename: &str) -> Result<UploadSuccess, FailureCause> {
        let endpoint = self.resolve_endpoint().await?;
        let form = self.build_form(data, filename)?;

        let request = self
            .descriptor
            .headers
            .iter()
            .fold(self.client.post(endpoint.clone()), |request, (key, value)| {
                request.header(key.as_str(), value.as_str())
            });

        let response = request
            .multipart(form)
            .send()
            .await
            .map_err(|e| FailureCause::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FailureCause::Transport(e.without_url().to_string()))?;

        let locator = self.descriptor.response.parse(status, &body, &endpoint)?;

        Ok(UploadSuccess {
            location: locator.location,
            direct_link: locator.direct_link,
            ttl_hint: self.descriptor.retention.clone(),
            service_name: self.descriptor.name.clone(),
        })
    }
}

#[async_trait]
impl BackendAdapter for HttpBackendAdapter {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    async fn submit(&self, data: Bytes, filename: &str) -> UploadAttemptResult {
        self.try_submit(data, filename)
            .await
            .map_err(|cause| UploadFailure::new(self.descriptor.name.clone(), cause))
    }
}
