use std::path::PathBuf;
use std::time::Duration;

use garde::Validate;
use serde::Deserialize;

/// How uploaded images are named inside the upload directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadNaming {
    /// Keep the client-supplied filename (final path component only).
    #[default]
    Original,
    /// Store under a random UUID, keeping only the extension.
    Opaque,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8080")
    #[serde(default = "default_bind_addr")]
    #[garde(length(min = 1))]
    pub bind_addr: String,

    /// Directory uploaded images are written to, relative to the working directory
    #[serde(default = "default_upload_dir")]
    #[garde(custom(non_empty_path))]
    pub upload_dir: PathBuf,

    #[serde(default)]
    #[garde(skip)]
    pub upload_naming: UploadNaming,

    /// DeepFace-compatible verification endpoint
    #[serde(default = "default_verify_url")]
    #[garde(length(min = 1))]
    pub verify_url: String,

    /// Deadline for a single call to the verification service
    #[serde(default = "default_verify_timeout_secs")]
    #[garde(range(min = 1))]
    pub verify_timeout_secs: u64,

    /// Cap on the total multipart request body
    #[serde(default = "default_max_upload_bytes")]
    #[garde(range(min = 1))]
    pub max_upload_bytes: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_verify_url() -> String {
    "http://localhost:5000/verify".to_string()
}

fn default_verify_timeout_secs() -> u64 {
    60
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024 // 10 MiB
}

fn non_empty_path(value: &PathBuf, _ctx: &()) -> garde::Result {
    if value.as_os_str().is_empty() {
        return Err(garde::Error::new("upload directory must not be empty"));
    }
    Ok(())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            upload_dir: default_upload_dir(),
            upload_naming: UploadNaming::default(),
            verify_url: default_verify_url(),
            verify_timeout_secs: default_verify_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl AppConfig {
    /// Load from the environment (and `.env` if present), then validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] garde::Report),
}
