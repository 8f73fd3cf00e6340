//! Stored document type
//!
//! A document is the declared field set of one record plus the
//! system-managed identity and timestamps. Derived attributes never appear
//! here.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One persisted record
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Validated field set
    pub fields: Map<String, Value>,
}

impl Document {
    /// Creates a new document with a fresh identifier.
    pub fn new(fields: Map<String, Value>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            fields,
        }
    }
}

/// What the store needs to know about a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
    /// Fields whose values must be unique across the collection
    pub unique_fields: Vec<String>,
}

impl CollectionSpec {
    pub fn new(name: impl Into<String>, unique_fields: Vec<String>) -> Self {
        Self {
            name: name.into(),
            unique_fields,
        }
    }
}

/// Collection and field names are interpolated into SQL, so both must be
/// plain identifiers.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
