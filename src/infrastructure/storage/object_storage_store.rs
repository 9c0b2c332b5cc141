use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{aws::AmazonS3Builder, path::Path, ObjectStore, PutPayload};
use tokio::fs;
use tracing::debug;

use crate::application::ports::{BlobStore, StorageError};
use crate::application::staging::StagedUpload;
use crate::domain::value_objects::StorageKey;
use crate::infrastructure::storage::PathBuilder;

/// Connection settings for an S3-compatible bucket
#[derive(Debug, Clone, Default)]
pub struct ObjectStorageSettings {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub public_base_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl ObjectStorageSettings {
    /// Base of the public object URLs handed out as storage keys
    pub fn base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }
}

/// Blob store uploading images to a remote bucket.
///
/// Keys are public object URLs; deletes only use the last path segment.
pub struct ObjectStorageStore {
    client: Arc<dyn ObjectStore>,
    base_url: String,
}

impl ObjectStorageStore {
    pub fn new(client: Arc<dyn ObjectStore>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build an S3 client from explicit settings
    pub fn from_settings(settings: &ObjectStorageSettings) -> Result<Self, StorageError> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(&settings.bucket)
            .with_region(&settings.region);

        // For localstack/minio
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.with_endpoint(endpoint);
            if endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
        }
        if let Some(key_id) = &settings.access_key_id {
            builder = builder.with_access_key_id(key_id);
        }
        if let Some(secret) = &settings.secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }

        let client = builder
            .build()
            .map_err(|e| StorageError::Remote(e.to_string()))?;
        Ok(Self::new(Arc::new(client), settings.base_url()))
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

fn remote_error(err: object_store::Error) -> StorageError {
    match err {
        object_store::Error::NotFound { path, .. } => StorageError::NotFound(path),
        other => StorageError::Remote(other.to_string()),
    }
}

#[async_trait]
impl BlobStore for ObjectStorageStore {
    async fn store(&self, upload: &StagedUpload) -> Result<StorageKey, StorageError> {
        // `put` overwrites, so the name itself has to be unique
        let name = PathBuilder::unique_object_name(upload.extension());
        let data = Bytes::from(fs::read(upload.path()).await?);

        debug!("Uploading {} ({} bytes)", name, data.len());
        self.client
            .put(&Path::from(name.as_str()), PutPayload::from(data))
            .await
            .map_err(remote_error)?;

        StorageKey::new(self.object_url(&name)).map_err(|e| StorageError::Internal(e.to_string()))
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError> {
        let name = key.object_name();
        if name.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        debug!("Deleting remote object {}", name);
        self.client
            .delete(&Path::from(name))
            .await
            .map_err(remote_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::staging::UploadStaging;
    use object_store::memory::InMemory;
    use tempfile::TempDir;

    #[test]
    fn test_default_base_url() {
        let settings = ObjectStorageSettings {
            bucket: "zoo-images".into(),
            region: "eu-central-1".into(),
            ..Default::default()
        };
        assert_eq!(
            settings.base_url(),
            "https://zoo-images.s3.eu-central-1.amazonaws.com"
        );
    }

    #[test]
    fn test_custom_base_url_trims_slash() {
        let settings = ObjectStorageSettings {
            public_base_url: Some("https://cdn.example.com/".into()),
            ..Default::default()
        };
        assert_eq!(settings.base_url(), "https://cdn.example.com");
    }

    #[tokio::test]
    async fn test_store_and_delete_round_trip() {
        let dir = TempDir::new().unwrap();
        let memory = Arc::new(InMemory::new());
        let store = ObjectStorageStore::new(memory.clone(), "https://bucket.example.com");
        let upload = UploadStaging::new(dir.path(), 1024)
            .stage_bytes("rex.png", "image/png", b"png")
            .await
            .unwrap();

        let key = store.store(&upload).await.unwrap();

        assert!(key.as_str().starts_with("https://bucket.example.com/"));
        assert!(key.as_str().ends_with(".png"));
        // The staging copy is left for the caller to discard
        assert!(upload.path().exists());

        let path = Path::from(key.object_name());
        let stored = memory.get(&path).await.unwrap().bytes().await.unwrap();
        assert_eq!(stored.as_ref(), b"png");

        store.delete(&key).await.unwrap();
        assert!(memory.get(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_back_to_back_stores_keep_every_object() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let memory = Arc::new(InMemory::new());
        let store = ObjectStorageStore::new(memory.clone(), "https://bucket.example.com");
        let staging = UploadStaging::new(dir.path(), 1024);

        // Act
        let mut keys = Vec::new();
        for i in 0..100u8 {
            let upload = staging
                .stage_bytes("rex.png", "image/png", &[i])
                .await
                .unwrap();
            keys.push(store.store(&upload).await.unwrap());
        }

        // Assert
        let distinct: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(distinct.len(), 100);
        store.delete(&keys[0]).await.unwrap();
        let second = memory
            .get(&Path::from(keys[1].object_name()))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(second.as_ref(), &[1u8]);
    }
}
