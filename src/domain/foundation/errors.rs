//! Validation failures raised while building domain values.

use thiserror::Error;

/// A value read from a payload, query string or stored session was unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is missing")]
    EmptyField { field: &'static str },

    #[error("{field} is invalid: {reason}")]
    InvalidFormat { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: &'static str) -> Self {
        ValidationError::EmptyField { field }
    }

    pub fn invalid_format(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_names_the_field() {
        let err = ValidationError::empty_field("session_id");
        assert_eq!(err.to_string(), "session_id is missing");
    }

    #[test]
    fn invalid_value_carries_the_reason() {
        let err = ValidationError::invalid_format("invoice_id", "not a number");
        assert_eq!(err.to_string(), "invoice_id is invalid: not a number");
    }
}
