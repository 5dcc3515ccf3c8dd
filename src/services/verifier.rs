use std::path::PathBuf;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use crate::models::upload::StoredImage;
use crate::models::verification::VerificationResult;

/// Longest slice of a non-2xx downstream body kept for logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Client for a DeepFace-compatible `/verify` endpoint.
pub struct DeepFaceClient {
    http: Client,
    verify_url: String,
}

impl DeepFaceClient {
    pub fn new(verify_url: impl Into<String>, timeout: Duration) -> Result<Self, VerifierError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(VerifierError::Client)?;

        Ok(Self {
            http,
            verify_url: verify_url.into(),
        })
    }

    /// Send both saved images to the verification service and return its verdict.
    ///
    /// The images are read back from disk and posted as `img1`/`img2` with
    /// fixed filenames. The response must be a JSON object; it is returned
    /// as-is without interpreting any field.
    pub async fn verify(
        &self,
        id_image: &StoredImage,
        face_image: &StoredImage,
    ) -> Result<VerificationResult, VerifierError> {
        let form = Form::new()
            .part(id_image.role.outbound_field(), image_part(id_image).await?)
            .part(face_image.role.outbound_field(), image_part(face_image).await?);

        let response = self
            .http
            .post(&self.verify_url)
            .multipart(form)
            .send()
            .await
            .map_err(VerifierError::from_transport)?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(VerifierError::from_transport)?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body)
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(VerifierError::UpstreamStatus { status, body });
        }

        serde_json::from_slice(&body).map_err(VerifierError::InvalidResponse)
    }

    /// Check that the verification host answers HTTP at all.
    ///
    /// Any status counts: the endpoint only accepts POST, so a 405 still
    /// proves the service is up.
    pub async fn health_check(&self, timeout: Duration) -> Result<(), VerifierError> {
        self.http
            .get(&self.verify_url)
            .timeout(timeout)
            .send()
            .await
            .map_err(VerifierError::from_transport)?;
        Ok(())
    }
}

async fn image_part(image: &StoredImage) -> Result<Part, VerifierError> {
    let data = tokio::fs::read(&image.path)
        .await
        .map_err(|source| VerifierError::ReadImage {
            path: image.path.clone(),
            source,
        })?;

    Part::bytes(data)
        .file_name(image.role.outbound_filename())
        .mime_str("application/octet-stream")
        .map_err(VerifierError::Client)
}

#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("Failed to read saved image {}: {source}", .path.display())]
    ReadImage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to build verification request: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Verification service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("Verification service timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("Verification service returned HTTP {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    #[error("Verification service returned invalid JSON: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl VerifierError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VerifierError::Timeout(err)
        } else {
            VerifierError::Unreachable(err)
        }
    }
}
