//! Local filesystem blob storage for request photos.
//!
//! Photos live under the media root at
//! `requests_photos/{user_id}/{uuid}.{ext}`; the relative path is what gets
//! persisted on the request row and served under `/media/`.

use std::path::{Path, PathBuf};

use civic_core::photo::{ValidatedPhoto, PHOTO_DIR};
use civic_core::types::DbId;
use uuid::Uuid;

/// Writes validated photos below a media root directory.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store a photo owned by `user_id`, returning its path relative to the root.
    ///
    /// Every call gets a fresh name, so an existing file is never overwritten.
    pub async fn save(&self, user_id: DbId, photo: &ValidatedPhoto) -> std::io::Result<String> {
        let relative = format!(
            "{PHOTO_DIR}/{user_id}/{}.{}",
            Uuid::new_v4(),
            photo.extension
        );
        let absolute = self.resolve(&relative);
        if let Some(parent) = absolute.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&absolute, &photo.bytes).await?;

        tracing::debug!(user_id, path = %relative, size = photo.bytes.len(), "Stored photo");
        Ok(relative)
    }

    /// Absolute location of a stored relative path.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_writes_under_owner_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path());
        let photo = ValidatedPhoto {
            extension: "png".to_string(),
            bytes: b"\x89PNG\r\n\x1a\n".to_vec(),
        };

        let relative = store.save(7, &photo).await.unwrap();
        assert!(relative.starts_with("requests_photos/7/"));
        assert!(relative.ends_with(".png"));

        let written = tokio::fs::read(store.resolve(&relative)).await.unwrap();
        assert_eq!(written, photo.bytes);
    }

    #[tokio::test]
    async fn each_save_gets_a_distinct_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path());
        let photo = ValidatedPhoto {
            extension: "jpg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        };

        let a = store.save(1, &photo).await.unwrap();
        let b = store.save(1, &photo).await.unwrap();
        assert_ne!(a, b);
    }
}
