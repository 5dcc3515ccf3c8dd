use std::path::PathBuf;
use std::str::FromStr;

use axum::body::Bytes;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The two images a verification request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ImageRole {
    /// Photo of the identity document.
    IdImage,
    /// Live photo of the person.
    FaceImage,
}

impl ImageRole {
    /// Multipart field name expected on the inbound request.
    pub fn field_name(self) -> &'static str {
        self.into()
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }

    /// Multipart field name the verification service expects.
    pub fn outbound_field(self) -> &'static str {
        match self {
            ImageRole::IdImage => "img1",
            ImageRole::FaceImage => "img2",
        }
    }

    /// Fixed filename sent downstream, whatever the upload was called.
    pub fn outbound_filename(self) -> &'static str {
        match self {
            ImageRole::IdImage => "id_image.jpg",
            ImageRole::FaceImage => "face_image.jpg",
        }
    }

    /// Short label used in user-facing messages ("id", "face").
    pub fn label(self) -> &'static str {
        match self {
            ImageRole::IdImage => "id",
            ImageRole::FaceImage => "face",
        }
    }
}

/// An image received in the request body, held in memory until saved.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub role: ImageRole,
    pub original_filename: String,
    pub data: Bytes,
}

/// An image written to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub role: ImageRole,
    pub original_filename: String,
    pub path: PathBuf,
    pub size: u64,
}
