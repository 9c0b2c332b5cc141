use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};

use super::RepositoryError;
use crate::domain::entities::Animal;
use crate::domain::value_objects::{AnimalId, CollationKey};

/// Port for animal persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnimalRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Animal>, RepositoryError>;

    async fn find_by_id(&self, id: &AnimalId) -> Result<Option<Animal>, RepositoryError>;

    /// Exact name match
    async fn find_by_name(&self, name: &str) -> Result<Option<Animal>, RepositoryError>;

    /// Match under the collation fold, used for duplicate checks
    async fn find_by_name_key(&self, key: &CollationKey)
        -> Result<Option<Animal>, RepositoryError>;

    async fn create(&self, animal: &Animal) -> Result<(), RepositoryError>;

    /// Update an existing animal; `NotFound` if it is gone
    async fn save(&self, animal: &Animal) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &AnimalId) -> Result<(), RepositoryError>;
}
