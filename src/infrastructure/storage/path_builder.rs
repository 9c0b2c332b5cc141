use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::application::ports::StorageError;
use crate::domain::value_objects::StorageKey;

/// Directory under the public root that holds stored images
pub const IMAGES_DIR: &str = "images";

/// Utility for generating storage paths and object names
#[derive(Debug, Clone)]
pub struct PathBuilder {
    public_root: PathBuf,
}

impl PathBuilder {
    pub fn new(public_root: PathBuf) -> Self {
        Self { public_root }
    }

    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    /// Directory for stored images: {public_root}/images
    pub fn images_dir(&self) -> PathBuf {
        self.public_root.join(IMAGES_DIR)
    }

    /// Object name for a blob stored at a given time: {unix millis}{ext}
    pub fn object_name_at(millis: i64, extension: &str) -> String {
        format!("{}{}", millis, extension)
    }

    /// Object name that cannot collide with another upload, even one made in
    /// the same millisecond by another process: {unix millis}-{uuid}{ext}
    pub fn unique_object_name(extension: &str) -> String {
        format!(
            "{}-{}{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension
        )
    }

    /// Storage key of a stored image: images/{name}
    pub fn image_key(name: &str) -> String {
        format!("{}/{}", IMAGES_DIR, name)
    }

    /// Resolve a key to a path below the public root.
    /// Keys that are absolute or climb out of the root are rejected.
    pub fn resolve(&self, key: &StorageKey) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key.as_str());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.public_root.join(relative))
    }
}
