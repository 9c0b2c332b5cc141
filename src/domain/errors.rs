use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{message}")]
    ValidationError { field: String, message: String },

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid storage key: {0}")]
    InvalidStorageKey(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("At least one role is required")]
    EmptyRoles,
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
