use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};

use super::RepositoryError;
use crate::domain::entities::Note;
use crate::domain::value_objects::{CollationKey, NoteId, UserId};

/// Port for note persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Note>, RepositoryError>;

    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, RepositoryError>;

    /// Match under the collation fold, used for duplicate checks
    async fn find_by_title_key(&self, key: &CollationKey)
        -> Result<Option<Note>, RepositoryError>;

    /// Reserve the next ticket number. The first ticket is 500.
    async fn next_ticket(&self) -> Result<i64, RepositoryError>;

    /// Whether any note is assigned to the user
    async fn exists_for_user(&self, user: &UserId) -> Result<bool, RepositoryError>;

    async fn create(&self, note: &Note) -> Result<(), RepositoryError>;

    async fn save(&self, note: &Note) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &NoteId) -> Result<(), RepositoryError>;
}
