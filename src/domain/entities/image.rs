use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AnimalId, ImageId, StorageKey};

/// Image record pointing at a stored blob. Its lifecycle depends on the owning animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    id: ImageId,
    animal: AnimalId,
    path: StorageKey,
    caption: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Image {
    /// Create an image record for a blob that has already been stored
    pub fn new(animal: AnimalId, path: StorageKey, caption: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ImageId::new(),
            animal,
            path,
            caption: caption.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn reconstruct(
        id: ImageId,
        animal: AnimalId,
        path: StorageKey,
        caption: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            animal,
            path,
            caption,
            created_at,
            updated_at,
        }
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
        self.updated_at = Utc::now();
    }

    pub fn id(&self) -> &ImageId {
        &self.id
    }

    pub fn animal(&self) -> &AnimalId {
        &self.animal
    }

    pub fn path(&self) -> &StorageKey {
        &self.path
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
