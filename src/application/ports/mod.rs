mod animal_repository;
mod blob_store;
mod image_repository;
mod note_repository;
mod password_hasher;
mod repository_error;
mod token_service;
mod user_repository;

pub use animal_repository::AnimalRepository;
pub use blob_store::{BlobStore, StorageError};
pub use image_repository::ImageRepository;
pub use note_repository::NoteRepository;
pub use password_hasher::{CredentialError, PasswordHasher};
pub use repository_error::RepositoryError;
pub use token_service::{AccessClaims, RefreshClaims, TokenError, TokenService};
pub use user_repository::UserRepository;

#[cfg(test)]
pub use animal_repository::MockAnimalRepository;
#[cfg(test)]
pub use blob_store::MockBlobStore;
#[cfg(test)]
pub use image_repository::MockImageRepository;
#[cfg(test)]
pub use note_repository::MockNoteRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use token_service::MockTokenService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
