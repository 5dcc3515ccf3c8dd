use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::UploadNaming;
use crate::models::upload::{StoredImage, UploadedImage};

/// Flat local directory holding uploaded images.
///
/// The directory is shared by every request and never cleaned up. Writes go
/// to a temp file first and are renamed into place, so concurrent uploads
/// under the same name never interleave: the last rename wins.
pub struct UploadStore {
    dir: PathBuf,
    naming: UploadNaming,
}

impl UploadStore {
    /// Open the store, creating the directory if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>, naming: UploadNaming) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir, naming })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an uploaded image to disk and return where it landed.
    pub async fn save(&self, image: &UploadedImage) -> Result<StoredImage, StorageError> {
        let path = self.dir.join(self.destination_name(&image.original_filename));
        let tmp = self.dir.join(format!(".{}.part", Uuid::new_v4()));

        if let Err(source) = tokio::fs::write(&tmp, &image.data).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::Write { path, source });
        }

        if let Err(source) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::Write { path, source });
        }

        Ok(StoredImage {
            role: image.role,
            original_filename: image.original_filename.clone(),
            path,
            size: image.data.len() as u64,
        })
    }

    /// Confirm the directory is still there (for health checks).
    pub async fn health_check(&self) -> Result<(), StorageError> {
        let metadata = tokio::fs::metadata(&self.dir)
            .await
            .map_err(|source| StorageError::Unavailable {
                path: self.dir.clone(),
                source,
            })?;

        if !metadata.is_dir() {
            return Err(StorageError::Unavailable {
                path: self.dir.clone(),
                source: std::io::Error::other("not a directory"),
            });
        }
        Ok(())
    }

    fn destination_name(&self, original: &str) -> String {
        let name = sanitize_filename(original);
        match (self.naming, name) {
            (UploadNaming::Original, Some(name)) => name.to_string(),
            (UploadNaming::Original, None) => opaque_name(None),
            (UploadNaming::Opaque, name) => opaque_name(name),
        }
    }
}

/// Reduce a client filename to its final path component.
///
/// Returns `None` when nothing usable is left (empty, `.`, `..`, NUL bytes).
pub fn sanitize_filename(original: &str) -> Option<&str> {
    let name = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
        return None;
    }
    Some(name)
}

fn opaque_name(original: Option<&str>) -> String {
    let ext = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match ext {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_ascii_lowercase()),
        None => Uuid::new_v4().to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to create upload directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Upload directory {} is unavailable: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },
}
