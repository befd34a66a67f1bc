//! Validation error types.

use thiserror::Error;

/// Result type for breaker construction and validation.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Validation error for a single field.
///
/// This is the only error kind raised by this crate. It is always raised
/// synchronously, before any underlying breaker engine is instantiated, so a
/// caller never observes a partially constructed breaker.
#[derive(Debug, Clone, Error)]
#[error("validation failed for `{field}`: {message}")]
pub struct ValidationError {
    /// Field name (dotted path for nested fields, e.g. `config.source_name`).
    pub field: String,

    /// Human-readable error message.
    pub message: String,

    /// Validation constraint that failed.
    pub constraint: String,

    /// Value that failed validation, when one was present.
    pub value: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            constraint: "custom".to_string(),
            value: None,
        }
    }

    /// Set the constraint name.
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = constraint.into();
        self
    }

    /// Set the invalid value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Prefix the field path with an enclosing scope.
    ///
    /// Used when a composite request re-reports a nested failure, e.g.
    /// `source_name` becomes `config.source_name`.
    pub fn scoped(mut self, scope: &str) -> Self {
        self.field = format!("{scope}.{}", self.field);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_field() {
        let err = ValidationError::new("source_name", "is required")
            .with_constraint("required");
        assert_eq!(
            err.to_string(),
            "validation failed for `source_name`: is required"
        );
        assert_eq!(err.constraint, "required");
        assert!(err.value.is_none());
    }

    #[test]
    fn test_scoped_prefixes_field_path() {
        let err = ValidationError::new("target_name", "is required").scoped("config");
        assert_eq!(err.field, "config.target_name");
    }
}
