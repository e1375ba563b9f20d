//! Declarative backend configuration.
//!
//! Each remote service is described by a `[[backend]]` table; the order of the
//! tables is the order in which backends are tried.

use reqwest::Url;
use serde::Deserialize;
use shotbox_core::UploaderConfig;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::response::ResponseRule;

/// Placeholder in `endpoint` replaced by the node a handshake returns.
pub const NODE_PLACEHOLDER: &str = "{node}";

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to read backends file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid backends file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("backend '{name}': {reason}")]
    Invalid { name: String, reason: String },

    #[error("no backends defined")]
    Empty,
}

/// Preliminary request that picks the node to upload to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Handshake {
    pub url: String,
    /// JSON pointer to the node name in the handshake reply.
    pub node_pointer: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendDescriptor {
    pub name: String,
    /// Upload URL. May contain `{node}` when a handshake is declared.
    pub endpoint: String,
    #[serde(default)]
    pub handshake: Option<Handshake>,
    /// Multipart field carrying the file.
    #[serde(default = "default_file_field")]
    pub file_field: String,
    /// Extra text fields sent with every upload.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub response: ResponseRule,
    /// Human-readable retention the service advertises.
    #[serde(default)]
    pub retention: Option<String>,
}

fn default_file_field() -> String {
    shotbox_core::constants::UPLOAD_FIELD_NAME.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DescriptorFile {
    #[serde(default, rename = "backend")]
    backends: Vec<BackendDescriptor>,
}

impl BackendDescriptor {
    /// Parse and validate a TOML document of `[[backend]]` tables.
    pub fn from_toml_str(input: &str) -> Result<Vec<Self>, DescriptorError> {
        let file: DescriptorFile = toml::from_str(input)?;
        if file.backends.is_empty() {
            return Err(DescriptorError::Empty);
        }

        let mut seen = HashSet::new();
        for descriptor in &file.backends {
            descriptor.validate()?;
            if !seen.insert(descriptor.name.as_str()) {
                return Err(descriptor.invalid("duplicate backend name"));
            }
        }

        Ok(file.backends)
    }

    /// Descriptor for a Shotbox ingestion server at `base_url`.
    pub fn local_server(base_url: &str) -> Self {
        BackendDescriptor {
            name: "local".to_string(),
            endpoint: format!("{}/upload", base_url.trim_end_matches('/')),
            handshake: None,
            file_field: default_file_field(),
            fields: BTreeMap::new(),
            headers: BTreeMap::new(),
            response: ResponseRule::Json {
                success_pointer: Some("/ok".to_string()),
                success_value: Some(serde_json::Value::Bool(true)),
                location_pointer: "/url".to_string(),
                direct_link_pointer: None,
            },
            retention: None,
        }
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }
        if self.file_field.trim().is_empty() {
            return Err(self.invalid("file_field must not be empty"));
        }

        let templated = self.endpoint.contains(NODE_PLACEHOLDER);
        match (&self.handshake, templated) {
            (Some(_), false) => {
                return Err(self.invalid("handshake declared but endpoint has no {node}"))
            }
            (None, true) => return Err(self.invalid("endpoint uses {node} without a handshake")),
            _ => {}
        }

        check_http_url(&self.endpoint.replace(NODE_PLACEHOLDER, "node"))
            .map_err(|reason| self.invalid(&format!("endpoint {}", reason)))?;

        if let Some(handshake) = &self.handshake {
            check_http_url(&handshake.url)
                .map_err(|reason| self.invalid(&format!("handshake url {}", reason)))?;
            check_pointer(&handshake.node_pointer).map_err(|reason| self.invalid(&reason))?;
        }

        for pointer in self.response.pointers() {
            check_pointer(pointer).map_err(|reason| self.invalid(&reason))?;
        }

        Ok(())
    }

    fn invalid(&self, reason: &str) -> DescriptorError {
        DescriptorError::Invalid {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

fn check_http_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("is not a valid URL: {}", e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err("must use http or https".to_string());
    }
    Ok(())
}

fn check_pointer(pointer: &str) -> Result<(), String> {
    if pointer.starts_with('/') {
        Ok(())
    } else {
        Err(format!("'{}' is not a JSON pointer", pointer))
    }
}

/// Load descriptors from a TOML file.
pub fn load_descriptors(path: &Path) -> Result<Vec<BackendDescriptor>, DescriptorError> {
    let input = std::fs::read_to_string(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    BackendDescriptor::from_toml_str(&input)
}

/// Backends for a client configuration: the configured file, or the ingestion
/// server alone when no file is set.
pub fn resolve_descriptors(
    config: &UploaderConfig,
) -> Result<Vec<BackendDescriptor>, DescriptorError> {
    match &config.backends_file {
        Some(path) => load_descriptors(path),
        None => Ok(vec![BackendDescriptor::local_server(&config.server_url)]),
    }
}
