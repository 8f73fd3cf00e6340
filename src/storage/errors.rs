//! Storage error types
//!
//! Error codes:
//! - RECORDHUB_STORAGE_DUPLICATE (unique constraint violated)
//! - RECORDHUB_STORAGE_UNKNOWN_COLLECTION
//! - RECORDHUB_STORAGE_INVALID_NAME
//! - RECORDHUB_STORAGE_CORRUPT (stored row cannot be decoded)
//! - RECORDHUB_STORAGE_UNAVAILABLE (engine failure)

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// A write would store a second document with the same unique value
    #[error("Duplicate value for unique field '{field}' in collection '{collection}'")]
    Duplicate { collection: String, field: String },

    /// Collection was never registered with the store
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// Collection or field name is not a plain identifier
    #[error("Invalid identifier: {0}")]
    InvalidName(String),

    /// A stored document could not be decoded
    #[error("Corrupt document: {0}")]
    Corrupt(String),

    /// The engine failed
    #[error("Storage unavailable: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Document body could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A writer panicked while holding the store lock
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::Duplicate { .. } => "RECORDHUB_STORAGE_DUPLICATE",
            StorageError::UnknownCollection(_) => "RECORDHUB_STORAGE_UNKNOWN_COLLECTION",
            StorageError::InvalidName(_) => "RECORDHUB_STORAGE_INVALID_NAME",
            StorageError::Corrupt(_) | StorageError::Serialization(_) => {
                "RECORDHUB_STORAGE_CORRUPT"
            }
            StorageError::Sqlite(_) | StorageError::LockPoisoned => "RECORDHUB_STORAGE_UNAVAILABLE",
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StorageError::Duplicate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_code() {
        let err = StorageError::Duplicate {
            collection: "students".into(),
            field: "email".into(),
        };
        assert!(err.is_duplicate());
        assert_eq!(err.code(), "RECORDHUB_STORAGE_DUPLICATE");
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_unavailable_code() {
        assert_eq!(StorageError::LockPoisoned.code(), "RECORDHUB_STORAGE_UNAVAILABLE");
        assert!(!StorageError::LockPoisoned.is_duplicate());
    }
}
