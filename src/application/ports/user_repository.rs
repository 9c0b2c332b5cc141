use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};

use super::RepositoryError;
use crate::domain::entities::User;
use crate::domain::value_objects::{CollationKey, UserId};

/// Port for user persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Exact username match, used by login
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// Match under the collation fold, used for duplicate checks
    async fn find_by_username_key(
        &self,
        key: &CollationKey,
    ) -> Result<Option<User>, RepositoryError>;

    async fn create(&self, user: &User) -> Result<(), RepositoryError>;

    async fn save(&self, user: &User) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &UserId) -> Result<(), RepositoryError>;
}
