//! Error type shared by every use case
//!
//! Validation, conflict and not-found failures are detected before any store
//! is mutated. Store failures carry the underlying port error.

use thiserror::Error;

use crate::application::ports::{CredentialError, RepositoryError, StorageError};
use crate::application::staging::StagingError;
use crate::domain::authorization::AuthorizationError;
use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UnsupportedMedia(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UseCaseError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Whether this error comes from a store rather than from the request
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Repository(_) | Self::Storage(_) | Self::Credential(_) | Self::Internal(_)
        )
    }
}

impl From<DomainError> for UseCaseError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError { message, .. } => Self::Validation(message),
            DomainError::UnsupportedMedia(message) => Self::UnsupportedMedia(message),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<RepositoryError> for UseCaseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // A record removed between lookup and write
            RepositoryError::NotFound(message) => Self::NotFound(message),
            other => Self::Repository(other),
        }
    }
}

impl From<StagingError> for UseCaseError {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::UnsupportedMedia(domain) => domain.into(),
            StagingError::TooLarge(_) => Self::Validation(err.to_string()),
            StagingError::Io(io) => Self::Storage(StorageError::Io(io)),
        }
    }
}

impl From<AuthorizationError> for UseCaseError {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::AuthenticationRequired => Self::Unauthorized(err.to_string()),
            AuthorizationError::PermissionDenied(_) => Self::Forbidden("Forbidden".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_keeps_message() {
        let err: UseCaseError =
            DomainError::validation("name", "Name and description fields are required").into();

        assert!(matches!(err, UseCaseError::Validation(_)));
        assert_eq!(err.to_string(), "Name and description fields are required");
    }

    #[test]
    fn test_unsupported_media_maps_through() {
        let err: UseCaseError = DomainError::UnsupportedMedia("nope".to_string()).into();
        assert!(matches!(err, UseCaseError::UnsupportedMedia(m) if m == "nope"));
    }

    #[test]
    fn test_other_domain_errors_are_validation() {
        let err: UseCaseError = DomainError::InvalidRole("Boss".to_string()).into();
        assert!(matches!(err, UseCaseError::Validation(_)));
        assert!(!err.is_internal());
    }

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err: UseCaseError = RepositoryError::NotFound("Animal not found".to_string()).into();
        assert!(matches!(err, UseCaseError::NotFound(_)));
    }

    #[test]
    fn test_store_errors_are_internal() {
        let repo: UseCaseError = RepositoryError::Internal("boom".to_string()).into();
        let storage: UseCaseError = StorageError::Remote("down".to_string()).into();

        assert!(repo.is_internal());
        assert!(storage.is_internal());
        assert!(repo.to_string().contains("Repository error"));
    }

    #[test]
    fn test_staging_too_large_is_validation() {
        let err: UseCaseError = StagingError::TooLarge(10).into();
        assert!(matches!(err, UseCaseError::Validation(_)));
    }

    #[test]
    fn test_authorization_errors() {
        let denied: UseCaseError =
            AuthorizationError::PermissionDenied("users:read".to_string()).into();
        assert!(matches!(denied, UseCaseError::Forbidden(_)));

        let missing: UseCaseError = AuthorizationError::AuthenticationRequired.into();
        assert!(matches!(missing, UseCaseError::Unauthorized(_)));
    }
}
