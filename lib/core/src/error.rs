//! Error handling foundation for roles-auth.
//!
//! This module provides the `Result` type alias using rootcause and the
//! shape-validation error shared by every record type. Each crate defines
//! its own domain-specific error types in its own error module and adds
//! layer-appropriate context as errors propagate up the stack.

use rootcause::Report;
use std::fmt;

/// A Result type alias using rootcause's Report for error handling.
///
/// Each layer adds its own context as errors propagate.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

/// A record or payload does not have the declared shape.
///
/// Validation errors indicate programmer error: a value that should never
/// have been constructed reached a validation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty.
    Empty { field: String },
    /// A field contains a character that is not allowed.
    InvalidCharacter { field: String, character: char },
    /// A field has the wrong type or an unexpected value.
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    /// Returns the name of the offending field.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Empty { field }
            | Self::InvalidCharacter { field, .. }
            | Self::InvalidValue { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidCharacter { field, character } => {
                write!(f, "{field} must not contain '{character}'")
            }
            Self::InvalidValue { field, reason } => write!(f, "{field} is invalid: {reason}"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_type_works() {
        let ok: Result<i32, ValidationError> = Ok(42);
        assert_eq!(ok.expect("should be ok"), 42);

        let unit: Result<()> = Ok(());
        assert!(unit.is_ok());
    }

    #[test]
    fn validation_error_names_field() {
        let err = ValidationError::InvalidValue {
            field: "payload.state".to_string(),
            reason: "unknown variant".to_string(),
        };
        assert_eq!(err.field(), "payload.state");
        assert!(err.to_string().contains("payload.state"));
        assert!(err.to_string().contains("unknown variant"));
    }

    #[test]
    fn invalid_character_display() {
        let err = ValidationError::InvalidCharacter {
            field: "role".to_string(),
            character: '/',
        };
        assert_eq!(err.to_string(), "role must not contain '/'");
    }
}
