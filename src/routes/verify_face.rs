use std::time::Instant;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::upload::{ImageRole, StoredImage, UploadedImage};
use crate::models::verification::VerificationResult;

/// POST /api/verify-face — Upload an ID photo and a live face photo for verification.
///
/// Both `id_image` and `face_image` must be file parts. They are saved to the
/// upload directory, then relayed to the verification service, whose JSON
/// verdict is returned unchanged.
pub async fn verify_face(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VerificationResult>, ApiError> {
    let result = handle(&state, multipart).await;

    let outcome = match &result {
        Ok(_) => "relayed",
        Err(e) => e.outcome(),
    };
    metrics::counter!("face_verification_requests_total", "outcome" => outcome).increment(1);

    result.map(Json)
}

async fn handle(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<VerificationResult, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::MalformedMultipart(e.to_string()))?;
    let (id_image, face_image) = read_images(multipart).await?;

    let id_stored = save(state, &id_image).await?;
    let face_stored = save(state, &face_image).await?;

    tracing::info!(
        id_path = %id_stored.path.display(),
        face_path = %face_stored.path.display(),
        "Files uploaded successfully"
    );

    let start = Instant::now();
    let result = state.verifier.verify(&id_stored, &face_stored).await;
    metrics::histogram!("face_verification_relay_seconds").record(start.elapsed().as_secs_f64());
    let result = result?;

    tracing::info!(
        verified = ?result.verified(),
        relay_ms = start.elapsed().as_millis() as u64,
        "Verification result received"
    );
    tracing::debug!(result = ?result.0, "Verification service response");

    Ok(result)
}

/// Drain the multipart body, keeping the first file part for each role.
///
/// Nothing is written until both images have been received in full.
async fn read_images(mut multipart: Multipart) -> Result<(UploadedImage, UploadedImage), ApiError> {
    let mut id_image: Option<UploadedImage> = None;
    let mut face_image: Option<UploadedImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::MalformedMultipart(e.to_string()))?
    {
        let Some(role) = field.name().and_then(ImageRole::from_field_name) else {
            continue;
        };

        // A part without a (non-empty) filename is a plain form value, not a file
        let Some(original_filename) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
        else {
            continue;
        };

        let slot = match role {
            ImageRole::IdImage => &mut id_image,
            ImageRole::FaceImage => &mut face_image,
        };
        if slot.is_some() {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::MalformedMultipart(e.to_string()))?;

        *slot = Some(UploadedImage {
            role,
            original_filename,
            data,
        });
    }

    let id_image = id_image.ok_or(ApiError::MissingField(ImageRole::IdImage))?;
    let face_image = face_image.ok_or(ApiError::MissingField(ImageRole::FaceImage))?;
    Ok((id_image, face_image))
}

async fn save(state: &AppState, image: &UploadedImage) -> Result<StoredImage, ApiError> {
    let stored = state
        .storage
        .save(image)
        .await
        .map_err(|source| ApiError::Save {
            role: image.role,
            source,
        })?;

    metrics::counter!("face_verification_upload_bytes_total").increment(stored.size);
    Ok(stored)
}
