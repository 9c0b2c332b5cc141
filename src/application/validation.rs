//! Validation helpers shared by the use cases
//!
//! Request DTOs carry optional fields so that a missing field produces the
//! use case's own message instead of a deserialization failure.

use validator::Validate;

use crate::application::errors::UseCaseError;
use crate::domain::validation::Validation;

/// Trimmed value of an optional field, `None` when missing or blank
pub fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Require every field, failing with one shared message
pub fn require_all<'a, const N: usize>(
    fields: [&'a Option<String>; N],
    message: &str,
) -> Result<[&'a str; N], UseCaseError> {
    let mut values = [""; N];
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = present(field).ok_or_else(|| UseCaseError::validation(message))?;
    }
    Ok(values)
}

/// Parse an entity id, reporting a malformed value against its field
pub fn parse_id<T>(value: &str, field_name: &str) -> Result<T, UseCaseError>
where
    T: From<uuid::Uuid>,
{
    Ok(T::from(Validation::validate_uuid(value, field_name)?))
}

/// Run the DTO's declared constraints, reporting the first violation
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), UseCaseError> {
    payload.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(_, errors)| errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid value".to_string());
        UseCaseError::Validation(message)
    })
}
