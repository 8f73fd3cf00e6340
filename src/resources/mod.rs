//! Resource definitions
//!
//! A resource pairs a collection with its rule table and the attributes
//! derived on read. Both definitions are built once and shared for the
//! life of the process.

mod note;
mod student;

use std::fmt;
use std::sync::OnceLock;

use serde_json::{Map, Value};

use crate::schema::{Schema, SchemaValidator};
use crate::storage::CollectionSpec;

pub use student::{fees_balance, EMAIL_PATTERN, STATUSES};

/// Everything the repository and handlers need to serve one record kind
pub struct ResourceDef {
    /// Collection name, also the URL segment under `/api`
    pub collection: &'static str,
    /// Singular display name used in response messages
    pub label: &'static str,
    pub schema: Schema,
    derive: fn(&Map<String, Value>) -> Map<String, Value>,
}

impl ResourceDef {
    /// Attributes computed from stored fields. Never persisted.
    pub fn derived(&self, fields: &Map<String, Value>) -> Map<String, Value> {
        (self.derive)(fields)
    }

    pub fn validator(&self) -> SchemaValidator<'_> {
        SchemaValidator::new(&self.schema)
    }

    pub fn collection_spec(&self) -> CollectionSpec {
        CollectionSpec::new(self.collection, self.schema.unique_fields())
    }

    /// Mount path, e.g. `/api/students`
    pub fn base_path(&self) -> String {
        format!("/api/{}", self.collection)
    }
}

impl fmt::Debug for ResourceDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDef")
            .field("collection", &self.collection)
            .field("label", &self.label)
            .field("schema", &self.schema.schema_id)
            .finish()
    }
}

pub fn students() -> &'static ResourceDef {
    static STUDENTS: OnceLock<ResourceDef> = OnceLock::new();
    STUDENTS.get_or_init(student::definition)
}

pub fn notes() -> &'static ResourceDef {
    static NOTES: OnceLock<ResourceDef> = OnceLock::new();
    NOTES.get_or_init(note::definition)
}

/// Every resource served by the API, in mount order
pub fn all() -> [&'static ResourceDef; 2] {
    [students(), notes()]
}

/// Looks a resource up by collection name.
pub fn by_name(name: &str) -> Option<&'static ResourceDef> {
    all().into_iter().find(|r| r.collection == name)
}
