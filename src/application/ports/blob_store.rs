use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use thiserror::Error;

use crate::application::staging::StagedUpload;
use crate::domain::value_objects::StorageKey;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Object storage error: {0}")]
    Remote(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Port for image blob storage.
///
/// Exactly one implementation is active per deployment; the keys it returns
/// are only meaningful to that implementation.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist a staged upload and return its storage key.
    /// Local stores move the staged file; remote stores copy it.
    async fn store(&self, upload: &StagedUpload) -> Result<StorageKey, StorageError>;

    /// Delete the blob behind a key
    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError>;
}
