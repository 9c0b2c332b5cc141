//! Staged uploads
//!
//! An uploaded image is streamed into a temp file under the staging directory
//! before any use case sees it. The [`StagedUpload`] guard owns that file: it
//! is removed by [`StagedUpload::discard`] or, failing that, when the guard is
//! dropped, so every exit path of a request leaves the staging area clean.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::ImageMedia;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error(transparent)]
    UnsupportedMedia(#[from] DomainError),

    #[error("File exceeds the maximum upload size of {0} bytes")]
    TooLarge(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Factory for staged uploads in one staging directory
#[derive(Debug, Clone)]
pub struct UploadStaging {
    dir: PathBuf,
    max_bytes: u64,
}

impl UploadStaging {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Open a new staged file after checking the declared media
    pub async fn begin(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<StagingWriter, StagingError> {
        let media = ImageMedia::from_parts(file_name, content_type)?;

        fs::create_dir_all(&self.dir).await?;
        let path = self
            .dir
            .join(format!("{}{}", Uuid::new_v4(), media.extension()));
        let file = File::create(&path).await?;

        debug!("Staging upload {} at {}", file_name, path.display());

        Ok(StagingWriter {
            file,
            max_bytes: self.max_bytes,
            upload: StagedUpload {
                path,
                original_name: file_name.to_string(),
                media,
                size: 0,
                armed: true,
            },
        })
    }

    /// Stage an in-memory payload in one go
    pub async fn stage_bytes(
        &self,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<StagedUpload, StagingError> {
        let mut writer = self.begin(file_name, content_type).await?;
        writer.write_chunk(data).await?;
        writer.finish().await
    }
}

/// Writer for a staged file being received.
///
/// Dropping the writer before [`StagingWriter::finish`] removes the partial file.
pub struct StagingWriter {
    file: File,
    max_bytes: u64,
    upload: StagedUpload,
}

impl StagingWriter {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), StagingError> {
        let size = self.upload.size + chunk.len() as u64;
        if size > self.max_bytes {
            return Err(StagingError::TooLarge(self.max_bytes));
        }
        self.file.write_all(chunk).await?;
        self.upload.size = size;
        Ok(())
    }

    pub async fn finish(mut self) -> Result<StagedUpload, StagingError> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(self.upload)
    }
}

/// An uploaded image waiting in the staging area
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
    original_name: String,
    media: ImageMedia,
    size: u64,
    armed: bool,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn media(&self) -> &ImageMedia {
        &self.media
    }

    /// Lowercased extension including the dot
    pub fn extension(&self) -> &str {
        self.media.extension()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Remove the staged file. A file that was already moved away is not an error.
    pub async fn discard(mut self) {
        self.armed = false;
        match fs::remove_file(&self.path).await {
            Ok(()) => debug!("Discarded staged upload {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove staged upload {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_stage_bytes_writes_file() {
        let dir = TempDir::new().unwrap();
        let staging = UploadStaging::new(dir.path(), 1024);

        let upload = staging
            .stage_bytes("Rex.PNG", "image/png", b"png-bytes")
            .await
            .unwrap();

        assert_eq!(upload.size(), 9);
        assert_eq!(upload.extension(), ".png");
        assert_eq!(upload.original_name(), "Rex.PNG");
        assert_eq!(std::fs::read(upload.path()).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_discard_removes_file() {
        let dir = TempDir::new().unwrap();
        let staging = UploadStaging::new(dir.path(), 1024);
        let upload = staging
            .stage_bytes("a.jpg", "image/jpeg", b"jpg")
            .await
            .unwrap();
        let path = upload.path().to_path_buf();

        upload.discard().await;

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = TempDir::new().unwrap();
        let staging = UploadStaging::new(dir.path(), 1024);
        let upload = staging
            .stage_bytes("a.jpg", "image/jpeg", b"jpg")
            .await
            .unwrap();
        let path = upload.path().to_path_buf();

        drop(upload);

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_too_large_is_rejected_and_cleaned_up() {
        let dir = TempDir::new().unwrap();
        let staging = UploadStaging::new(dir.path(), 4);

        let result = staging.stage_bytes("a.png", "image/png", b"too big").await;

        assert!(matches!(result, Err(StagingError::TooLarge(4))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_media_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let staging = UploadStaging::new(dir.path().join("staging"), 1024);

        let result = staging.begin("a.gif", "image/gif").await;

        assert!(matches!(result, Err(StagingError::UnsupportedMedia(_))));
        assert!(!dir.path().join("staging").exists());
    }
}
