//! Repository error types
//!
//! Error codes:
//! - RECORDHUB_REPO_NOT_FOUND
//! - RECORDHUB_REPO_VALIDATION
//! - RECORDHUB_REPO_INVALID_BODY
//! - RECORDHUB_REPO_DUPLICATE
//! - RECORDHUB_REPO_STORAGE

use thiserror::Error;

use crate::schema::SchemaError;
use crate::storage::StorageError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Repository errors
#[derive(Debug, Error)]
pub enum RepoError {
    /// No record has the identifier, or the identifier is malformed
    #[error("{label} not found")]
    NotFound { label: &'static str },

    /// Field or cross-field rules failed
    #[error("Validation error: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),

    /// Request body is not a field set
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// A unique field already holds this value
    #[error("Duplicate {field}")]
    Duplicate { field: String },

    /// The store failed
    #[error(transparent)]
    Storage(StorageError),
}

impl RepoError {
    pub fn code(&self) -> &'static str {
        match self {
            RepoError::NotFound { .. } => "RECORDHUB_REPO_NOT_FOUND",
            RepoError::ValidationFailed(_) => "RECORDHUB_REPO_VALIDATION",
            RepoError::InvalidBody(_) => "RECORDHUB_REPO_INVALID_BODY",
            RepoError::Duplicate { .. } => "RECORDHUB_REPO_DUPLICATE",
            RepoError::Storage(_) => "RECORDHUB_REPO_STORAGE",
        }
    }

    /// Client-caused failures, as opposed to store failures
    pub fn is_rejection(&self) -> bool {
        !matches!(self, RepoError::Storage(_))
    }
}

impl From<SchemaError> for RepoError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::NotAnObject(found) => {
                RepoError::InvalidBody(format!("expected a JSON object, got {}", found))
            }
            err @ SchemaError::ValidationFailed(_) => RepoError::ValidationFailed(err.messages()),
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Duplicate { field, .. } => RepoError::Duplicate { field },
            other => RepoError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Violation;

    #[test]
    fn test_from_schema_error() {
        let err = RepoError::from(SchemaError::ValidationFailed(vec![
            Violation::new("name", "Please add a title"),
            Violation::new("content", "Please add content"),
        ]));
        assert!(matches!(err, RepoError::ValidationFailed(ref m) if m.len() == 2));
        assert_eq!(err.code(), "RECORDHUB_REPO_VALIDATION");

        let err = RepoError::from(SchemaError::NotAnObject("array"));
        assert_eq!(err.to_string(), "Invalid request body: expected a JSON object, got array");
    }

    #[test]
    fn test_from_storage_error() {
        let err = RepoError::from(StorageError::Duplicate {
            collection: "students".into(),
            field: "email".into(),
        });
        assert!(matches!(err, RepoError::Duplicate { ref field } if field == "email"));
        assert!(err.is_rejection());

        let err = RepoError::from(StorageError::LockPoisoned);
        assert!(!err.is_rejection());
        assert_eq!(err.to_string(), "Storage lock poisoned");
    }

    #[test]
    fn test_not_found_message() {
        let err = RepoError::NotFound { label: "Note" };
        assert_eq!(err.to_string(), "Note not found");
    }
}
