//! Configuration module
//!
//! Environment-driven settings for the ingestion server and the capture
//! uploader. Both read `.env` through dotenvy before falling back to defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_PUBLIC_PATH_PREFIX};

const DEFAULT_PORT: u16 = 3000;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const ATTEMPT_TIMEOUT_SECS: u64 = 30;
const RETRY_DELAY_MS: u64 = 1000;
const MIB: usize = 1024 * 1024;

fn var_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

/// Ingestion server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub public_path_prefix: String,
    pub max_file_size_bytes: usize,
    pub http_concurrency_limit: usize,
    /// Emit logs as JSON lines (`LOG_FORMAT=json`).
    pub log_json: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = var_or(&lookup, "CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mut public_path_prefix =
            var_or(&lookup, "PUBLIC_PATH_PREFIX", DEFAULT_PUBLIC_PATH_PREFIX);
        while public_path_prefix.len() > 1 && public_path_prefix.ends_with('/') {
            public_path_prefix.pop();
        }

        let max_file_size_mb: usize =
            parse_var(&lookup, "MAX_FILE_SIZE_MB", DEFAULT_MAX_FILE_SIZE_MB)?;
        let max_file_size_bytes = max_file_size_mb
            .checked_mul(MIB)
            .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))?;

        let config = ServerConfig {
            server_port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            environment,
            cors_origins,
            upload_dir: PathBuf::from(var_or(&lookup, "UPLOAD_DIR", "uploads")),
            public_path_prefix,
            max_file_size_bytes,
            http_concurrency_limit: parse_var(
                &lookup,
                "HTTP_CONCURRENCY_LIMIT",
                HTTP_CONCURRENCY_LIMIT,
            )?,
            log_json: var_or(&lookup, "LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        if self.checked_body_limit().is_none() {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"));
        }

        if !self.public_path_prefix.starts_with('/') || self.public_path_prefix.len() < 2 {
            return Err(anyhow::anyhow!(
                "PUBLIC_PATH_PREFIX must start with '/' and name a path segment"
            ));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than zero"
            ));
        }

        Ok(())
    }

    /// Transport-level request body limit. Leaves room for multipart framing
    /// so oversized files are rejected by the streaming check first.
    pub fn request_body_limit(&self) -> usize {
        self.checked_body_limit().unwrap_or(usize::MAX)
    }

    fn checked_body_limit(&self) -> Option<usize> {
        self.max_file_size_bytes.checked_mul(2)?.checked_add(MIB)
    }
}

/// Capture uploader configuration
#[derive(Clone, Debug)]
pub struct UploaderConfig {
    pub attempt_timeout: Duration,
    pub retry_delay: Duration,
    /// TOML file with `[[backend]]` descriptors. When unset only the local
    /// ingestion server is tried.
    pub backends_file: Option<PathBuf>,
    pub server_url: String,
    pub fallback_dir: PathBuf,
}

impl UploaderConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = UploaderConfig {
            attempt_timeout: Duration::from_secs(parse_var(
                &lookup,
                "UPLOAD_ATTEMPT_TIMEOUT_SECS",
                ATTEMPT_TIMEOUT_SECS,
            )?),
            retry_delay: Duration::from_millis(parse_var(
                &lookup,
                "UPLOAD_RETRY_DELAY_MS",
                RETRY_DELAY_MS,
            )?),
            backends_file: lookup("UPLOAD_BACKENDS_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            server_url: var_or(&lookup, "UPLOAD_SERVER_URL", "http://localhost:3000"),
            fallback_dir: PathBuf::from(var_or(&lookup, "FALLBACK_DIR", "captures")),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.attempt_timeout.is_zero() {
            return Err(anyhow::anyhow!(
                "UPLOAD_ATTEMPT_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "UPLOAD_SERVER_URL must be an http:// or https:// URL"
            ));
        }

        Ok(())
    }
}
