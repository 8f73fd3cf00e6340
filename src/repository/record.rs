//! Read model
//!
//! A [`Record`] is a stored document plus its derived attributes, shaped
//! for the wire: `_id`, the declared fields, derived attributes, then
//! `createdAt` and `updatedAt`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::schema::format_timestamp;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub fields: Map<String, Value>,
    pub derived: Map<String, Value>,
}

impl Record {
    /// Stored or derived attribute by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).or_else(|| self.derived.get(name))
    }

    /// Wire shape of the record
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("_id".to_string(), Value::String(self.id.to_string()));
        for (k, v) in self.fields.iter().chain(self.derived.iter()) {
            out.insert(k.clone(), v.clone());
        }
        out.insert(
            "createdAt".to_string(),
            Value::String(format_timestamp(&self.created_at)),
        );
        out.insert(
            "updatedAt".to_string(),
            Value::String(format_timestamp(&self.updated_at)),
        );
        Value::Object(out)
    }
}
