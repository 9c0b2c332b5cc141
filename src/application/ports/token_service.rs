#[cfg(test)]
use mockall::{automock, predicate::*};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::User;
use crate::domain::value_objects::Role;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// Claims of a short-lived access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub username: String,
    pub roles: Vec<Role>,
    pub iat: usize,
    pub exp: usize,
}

/// Claims of a long-lived refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}

/// Issues and verifies session tokens
#[cfg_attr(test, automock)]
pub trait TokenService: Send + Sync {
    fn issue_access_token(&self, user: &User) -> Result<String, TokenError>;

    fn issue_refresh_token(&self, user: &User) -> Result<String, TokenError>;

    fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError>;

    fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError>;

    /// Lifetime of refresh tokens, used for the session cookie
    fn refresh_ttl_secs(&self) -> i64;
}
