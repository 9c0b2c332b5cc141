use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};

use super::RepositoryError;
use crate::domain::entities::Image;
use crate::domain::value_objects::{AnimalId, ImageId};

/// Port for image record persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Image>, RepositoryError>;

    async fn find_by_id(&self, id: &ImageId) -> Result<Option<Image>, RepositoryError>;

    /// All images belonging to an animal, oldest first
    async fn find_by_animal(&self, animal: &AnimalId) -> Result<Vec<Image>, RepositoryError>;

    async fn create(&self, image: &Image) -> Result<(), RepositoryError>;

    async fn save(&self, image: &Image) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &ImageId) -> Result<(), RepositoryError>;
}
