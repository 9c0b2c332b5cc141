//! Common validation utilities for domain objects and request payloads
//!
//! Every use case validates its whole payload up front with these helpers,
//! before any store is touched.

use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Validation result type
pub type ValidationResult<T> = Result<T, DomainError>;

/// Common validation utilities
pub struct Validation;

impl Validation {
    /// A value is blank when it is empty or whitespace only
    pub fn is_blank(value: &str) -> bool {
        value.trim().is_empty()
    }

    /// Validate that every named field is present, reporting the first missing
    /// one with a shared message
    pub fn require_fields(fields: &[(&str, &str)], message: &str) -> ValidationResult<()> {
        match fields.iter().find(|(_, value)| Self::is_blank(value)) {
            Some((field, _)) => Err(DomainError::validation(*field, message)),
            None => Ok(()),
        }
    }

    /// Validate that an optional field is present and return it trimmed
    pub fn require_field<'a>(
        value: Option<&'a str>,
        field_name: &str,
        message: &str,
    ) -> ValidationResult<&'a str> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(DomainError::validation(field_name, message)),
        }
    }

    /// Validate UUID format
    pub fn validate_uuid(value: &str, field_name: &str) -> ValidationResult<Uuid> {
        Uuid::parse_str(value.trim()).map_err(|_| {
            DomainError::validation(field_name, format!("Invalid {} format", field_name))
        })
    }

    /// Validate that a collection is not empty
    pub fn validate_not_empty_collection<T>(
        collection: &[T],
        field_name: &str,
        message: &str,
    ) -> ValidationResult<()> {
        if collection.is_empty() {
            return Err(DomainError::validation(field_name, message));
        }
        Ok(())
    }
}
