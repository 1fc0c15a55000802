// src/services/storage.rs
// DOCUMENTATION: Filesystem storage for uploads
// PURPOSE: Write venue images and avatars under MEDIA_ROOT and read them back safely

use crate::errors::VenueError;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

pub const VENUE_IMAGES_DIR: &str = "venues/images";
pub const AVATARS_DIR: &str = "profiles/avatars";

/// Image types accepted for upload, by MIME type
const IMAGE_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// File extension for an accepted image MIME type
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next().unwrap_or("").trim();
    IMAGE_TYPES
        .iter()
        .find(|(m, _)| m.eq_ignore_ascii_case(mime))
        .map(|(_, ext)| *ext)
}

/// MIME type served for a stored file
pub fn content_type_for_path(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Normalized image extension of a local file, if it is one we accept
pub fn image_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("jpg"),
        "png" => Some("png"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        _ => None,
    }
}

/// Reject empty, absolute, and parent-relative paths
fn safe_relative(relative: &str) -> Result<PathBuf, VenueError> {
    let path = Path::new(relative);
    if relative.is_empty() || !path.components().all(|c| matches!(c, Component::Normal(_))) {
        log::warn!("Rejected media path: {}", relative);
        return Err(VenueError::NotFound(format!("Media '{}'", relative)));
    }
    Ok(path.to_path_buf())
}

/// Upload storage rooted at MEDIA_ROOT
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    max_bytes: usize,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        MediaStorage {
            root: root.into(),
            max_bytes,
        }
    }

    /// Write `bytes` under `dir` with a random file name; returns the path relative to the root
    pub async fn save(&self, dir: &str, extension: &str, bytes: &[u8]) -> Result<String, VenueError> {
        if bytes.is_empty() {
            return Err(VenueError::InvalidInput("Uploaded file is empty".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(VenueError::PayloadTooLarge(self.max_bytes));
        }

        let relative = format!("{}/{}.{}", dir, Uuid::new_v4().simple(), extension);
        let full = self.root.join(safe_relative(&relative)?);

        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                log::error!("Failed to create media directory {:?}: {}", parent, e);
                VenueError::StorageError(e.to_string())
            })?;
        }

        tokio::fs::write(&full, bytes).await.map_err(|e| {
            log::error!("Failed to write {:?}: {}", full, e);
            VenueError::StorageError(e.to_string())
        })?;

        log::info!("Stored {} bytes at {}", bytes.len(), relative);
        Ok(relative)
    }

    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, VenueError> {
        let full = self.root.join(safe_relative(relative)?);
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(VenueError::NotFound(format!("Media '{}'", relative)))
            }
            Err(e) => {
                log::error!("Failed to read {:?}: {}", full, e);
                Err(VenueError::StorageError(e.to_string()))
            }
        }
    }

    /// Remove a stored file; a missing file is not an error
    pub async fn delete(&self, relative: &str) {
        let full = match safe_relative(relative) {
            Ok(path) => self.root.join(path),
            Err(_) => return,
        };
        if let Err(e) = tokio::fs::remove_file(&full).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to delete {:?}: {}", full, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage(max_bytes: usize) -> MediaStorage {
        let root = std::env::temp_dir().join(format!("venuerate-test-{}", Uuid::new_v4().simple()));
        MediaStorage::new(root, max_bytes)
    }

    #[test]
    fn test_extension_for_content_type() {
        assert_eq!(extension_for_content_type("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for_content_type("IMAGE/PNG; charset=binary"), Some("png"));
        assert_eq!(extension_for_content_type("text/html"), None);
    }

    #[test]
    fn test_content_type_for_path() {
        assert_eq!(content_type_for_path("venues/images/a.JPG"), "image/jpeg");
        assert_eq!(content_type_for_path("profiles/avatars/b.webp"), "image/webp");
        assert_eq!(content_type_for_path("notes.txt"), "application/octet-stream");
    }

    #[test]
    fn test_safe_relative_rejects_traversal() {
        assert!(safe_relative("venues/images/a.jpg").is_ok());
        assert!(safe_relative("../etc/passwd").is_err());
        assert!(safe_relative("venues/../../secret").is_err());
        assert!(safe_relative("/etc/passwd").is_err());
        assert!(safe_relative("").is_err());
    }

    #[tokio::test]
    async fn test_save_and_read() {
        let storage = temp_storage(64);
        let path = storage.save(VENUE_IMAGES_DIR, "png", b"fake-png").await.unwrap();
        assert!(path.starts_with("venues/images/"));
        assert!(path.ends_with(".png"));

        let bytes = storage.read(&path).await.unwrap();
        assert_eq!(bytes, b"fake-png");

        storage.delete(&path).await;
        assert!(matches!(storage.read(&path).await, Err(VenueError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_save_rejects_empty_and_oversized() {
        let storage = temp_storage(4);
        assert!(matches!(
            storage.save(AVATARS_DIR, "jpg", b"").await,
            Err(VenueError::InvalidInput(_))
        ));
        assert!(matches!(
            storage.save(AVATARS_DIR, "jpg", b"too large").await,
            Err(VenueError::PayloadTooLarge(4))
        ));
    }
}
