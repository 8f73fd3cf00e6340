//! Schema error types
//!
//! Validation never stops at the first bad field: every field is checked and
//! the violations are reported together, in rule-table order.

use std::fmt;

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field the rule is attached to
    pub field: String,
    /// Human-readable message shown to clients
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Schema errors
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// The candidate is not a JSON object
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// One or more field or cross-field rules failed
    #[error("Validation error: {}", join_messages(.0))]
    ValidationFailed(Vec<Violation>),
}

impl SchemaError {
    /// Messages of every violation, in order
    pub fn messages(&self) -> Vec<String> {
        match self {
            SchemaError::NotAnObject(_) => vec![self.to_string()],
            SchemaError::ValidationFailed(violations) => {
                violations.iter().map(|v| v.message.clone()).collect()
            }
        }
    }
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failed_display_joins_messages() {
        let err = SchemaError::ValidationFailed(vec![
            Violation::new("name", "Please add a student name"),
            Violation::new("email", "Please add a valid email"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation error: Please add a student name, Please add a valid email"
        );
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_not_an_object_messages() {
        let err = SchemaError::NotAnObject("array");
        assert_eq!(err.messages(), vec!["Expected a JSON object, got array".to_string()]);
    }
}
