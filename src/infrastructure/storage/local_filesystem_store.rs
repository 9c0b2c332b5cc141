use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::io::ErrorKind;
use tokio::fs::{self, File, OpenOptions};
use tracing::{debug, warn};

use crate::application::ports::{BlobStore, StorageError};
use crate::application::staging::StagedUpload;
use crate::domain::value_objects::StorageKey;
use crate::infrastructure::storage::PathBuilder;

/// Blob store keeping images on disk under the public root, where they are
/// served as static files
pub struct LocalFilesystemStore {
    path_builder: PathBuilder,
    durable_writes: bool,
}

impl LocalFilesystemStore {
    pub fn new(public_root: PathBuf) -> Self {
        Self::with_durability(public_root, true)
    }

    pub fn with_durability(public_root: PathBuf, durable_writes: bool) -> Self {
        Self {
            path_builder: PathBuilder::new(public_root),
            durable_writes,
        }
    }

    /// Initialize storage directories
    pub async fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.path_builder.images_dir()).await?;
        Ok(())
    }

    pub fn path_builder(&self) -> &PathBuilder {
        &self.path_builder
    }

    /// Reserve a destination by creating it exclusively. Names are millisecond
    /// timestamps; a name already taken, even by a concurrent upload, bumps
    /// the timestamp.
    async fn reserve_destination(
        &self,
        extension: &str,
    ) -> Result<(String, PathBuf), StorageError> {
        let images_dir = self.path_builder.images_dir();
        let mut millis = chrono::Utc::now().timestamp_millis();
        loop {
            let name = PathBuilder::object_name_at(millis, extension);
            let path = images_dir.join(&name);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(_) => return Ok((name, path)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => millis += 1,
                Err(e) => return Err(StorageError::Io(e)),
            }
        }
    }

    /// Rename, falling back to copy and remove when the staging directory
    /// sits on another filesystem
    async fn move_file(source: &Path, destination: &Path) -> Result<(), StorageError> {
        if fs::rename(source, destination).await.is_ok() {
            return Ok(());
        }

        debug!(
            "Rename failed, copying {:?} to {:?}",
            source, destination
        );
        if let Err(e) = fs::copy(source, destination).await {
            let _ = fs::remove_file(destination).await;
            return Err(StorageError::Io(e));
        }
        let _ = fs::remove_file(source).await;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalFilesystemStore {
    async fn store(&self, upload: &StagedUpload) -> Result<StorageKey, StorageError> {
        let images_dir = self.path_builder.images_dir();
        fs::create_dir_all(&images_dir).await?;

        let (name, destination) = self.reserve_destination(upload.extension()).await?;
        debug!("Moving staged upload to {:?}", destination);
        // The move replaces the empty reservation
        if let Err(e) = Self::move_file(upload.path(), &destination).await {
            let _ = fs::remove_file(&destination).await;
            return Err(e);
        }

        // Ensure parent directory is synced to persist the rename
        if self.durable_writes {
            match File::open(&images_dir).await {
                Ok(dir) => {
                    if let Err(e) = dir.sync_all().await {
                        warn!("Failed to sync images directory after rename: {}", e);
                    }
                }
                Err(e) => warn!("Failed to open images directory for sync: {}", e),
            }
        }

        StorageKey::new(PathBuilder::image_key(&name))
            .map_err(|e| StorageError::Internal(e.to_string()))
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError> {
        let path = self.path_builder.resolve(key)?;

        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        debug!("Deleted blob {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::staging::UploadStaging;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, LocalFilesystemStore, UploadStaging) {
        let root = TempDir::new().unwrap();
        let store = LocalFilesystemStore::with_durability(root.path().join("public"), false);
        store.init().await.unwrap();
        let staging = UploadStaging::new(root.path().join("staging"), 1024);
        (root, store, staging)
    }

    #[tokio::test]
    async fn test_init_creates_images_dir() {
        let (root, _store, _) = setup().await;
        assert!(root.path().join("public/images").is_dir());
    }

    #[tokio::test]
    async fn test_store_moves_staged_file() {
        let (root, store, staging) = setup().await;
        let upload = staging
            .stage_bytes("Rex.JPG", "image/jpeg", b"jpeg-data")
            .await
            .unwrap();
        let staged_path = upload.path().to_path_buf();

        let key = store.store(&upload).await.unwrap();

        assert!(key.as_str().starts_with("images/"));
        assert!(key.as_str().ends_with(".jpg"));
        assert!(!staged_path.exists());
        let stored = root.path().join("public").join(key.as_str());
        assert_eq!(std::fs::read(stored).unwrap(), b"jpeg-data");
    }

    #[tokio::test]
    async fn test_same_millisecond_uploads_get_distinct_names() {
        let (_root, store, staging) = setup().await;
        let first = staging.stage_bytes("a.png", "image/png", b"1").await.unwrap();
        let second = staging.stage_bytes("b.png", "image/png", b"2").await.unwrap();

        let a = store.store(&first).await.unwrap();
        let b = store.store(&second).await.unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_uploads_get_distinct_names() {
        // Arrange
        let (root, store, staging) = setup().await;
        let store = Arc::new(store);
        let mut uploads = Vec::new();
        for i in 0..16u8 {
            uploads.push(
                staging
                    .stage_bytes(&format!("{i}.png"), "image/png", &[i])
                    .await
                    .unwrap(),
            );
        }

        // Act
        let handles: Vec<_> = uploads
            .into_iter()
            .map(|upload| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.store(&upload).await.unwrap() })
            })
            .collect();
        let mut keys = HashSet::new();
        for handle in handles {
            keys.insert(handle.await.unwrap());
        }

        // Assert
        assert_eq!(keys.len(), 16);
        let stored = std::fs::read_dir(root.path().join("public/images"))
            .unwrap()
            .count();
        assert_eq!(stored, 16);
    }

    #[tokio::test]
    async fn test_store_skips_name_taken_on_disk() {
        let (root, store, staging) = setup().await;
        let now = chrono::Utc::now().timestamp_millis();
        // Occupy the next few millisecond names
        for offset in 0..50 {
            let name = PathBuilder::object_name_at(now + offset, ".png");
            std::fs::write(root.path().join("public/images").join(name), b"taken").unwrap();
        }
        let upload = staging.stage_bytes("a.png", "image/png", b"new").await.unwrap();

        let key = store.store(&upload).await.unwrap();

        let stored = root.path().join("public").join(key.as_str());
        assert_eq!(std::fs::read(stored).unwrap(), b"new");
        let files = std::fs::read_dir(root.path().join("public/images"))
            .unwrap()
            .count();
        assert_eq!(files, 51);
    }

    #[tokio::test]
    async fn test_delete() {
        let (root, store, staging) = setup().await;
        let upload = staging.stage_bytes("a.png", "image/png", b"x").await.unwrap();
        let key = store.store(&upload).await.unwrap();

        store.delete(&key).await.unwrap();

        assert!(!root.path().join("public").join(key.as_str()).exists());
        assert!(matches!(
            store.delete(&key).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_rejects_escaping_key() {
        let (_root, store, _) = setup().await;
        let key = StorageKey::new("../outside.png").unwrap();

        assert!(matches!(
            store.delete(&key).await,
            Err(StorageError::InvalidKey(_))
        ));
    }
}
