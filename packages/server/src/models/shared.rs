use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Plain acknowledgement body returned by deletes.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Pet deleted")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a required free-text field after trimming (1..=max Unicode characters).
pub fn validate_required_text(value: &str, field: &str, max: usize) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be 1-{max} characters"
        )));
    }
    Ok(())
}

/// Validate an optional short attribute (breed, type, gender): at most `max` characters.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max: usize,
) -> Result<(), AppError> {
    if let Some(value) = value
        && value.chars().count() > max
    {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Trim a free-text value, mapping blank input to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
