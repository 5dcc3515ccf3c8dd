use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::upload::ImageRole;
use crate::services::storage::StorageError;
use crate::services::verifier::VerifierError;

/// Failure of a `/api/verify-face` request, as seen by the caller.
///
/// Every variant renders as a short plain-text body with its own status;
/// full details only go to the log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body is not multipart, the stream broke, or it exceeded the size cap
    #[error("Could not parse multipart form: {0}")]
    MalformedMultipart(String),

    #[error("{} is required", .0.field_name())]
    MissingField(ImageRole),

    #[error("Failed to save {} image: {source}", .role.label())]
    Save {
        role: ImageRole,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Verification(#[from] VerifierError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedMultipart(_) | ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::Save { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Verification(err) => match err {
                VerifierError::ReadImage { .. } | VerifierError::Client(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                VerifierError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                VerifierError::Unreachable(_)
                | VerifierError::UpstreamStatus { .. }
                | VerifierError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// Message shown to the caller, without paths or upstream internals.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::MalformedMultipart(_) => "Could not parse multipart form".to_string(),
            ApiError::MissingField(role) => format!("{} is required", role.field_name()),
            ApiError::Save { role, .. } => format!("Failed to save {} image", role.label()),
            ApiError::Verification(err) => match err {
                VerifierError::ReadImage { .. } => "Failed to read saved image".to_string(),
                VerifierError::Client(_) => "Failed to build verification request".to_string(),
                VerifierError::Unreachable(_) => "Verification service unavailable".to_string(),
                VerifierError::Timeout(_) => "Verification service timed out".to_string(),
                VerifierError::UpstreamStatus { status, .. } => {
                    format!("Verification service returned HTTP {}", status.as_u16())
                }
                VerifierError::InvalidResponse(_) => {
                    "Verification service returned an invalid response".to_string()
                }
            },
        }
    }

    /// Label for the `outcome` metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            ApiError::MalformedMultipart(_) => "malformed_request",
            ApiError::MissingField(_) => "missing_field",
            ApiError::Save { .. } => "save_failed",
            ApiError::Verification(VerifierError::ReadImage { .. } | VerifierError::Client(_)) => {
                "relay_failed"
            }
            ApiError::Verification(VerifierError::Timeout(_)) => "upstream_timeout",
            ApiError::Verification(VerifierError::Unreachable(_)) => "upstream_unreachable",
            ApiError::Verification(VerifierError::UpstreamStatus { .. }) => "upstream_error",
            ApiError::Verification(VerifierError::InvalidResponse(_)) => "upstream_invalid",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Face verification failed");
        } else {
            tracing::warn!(error = %self, "Rejected face verification request");
        }

        (status, self.user_message()).into_response()
    }
}
