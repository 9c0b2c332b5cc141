use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// One-way password hashing
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// Check a plain password against a stored hash
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
}
