//! Repository
//!
//! CRUD for one resource over a [`DocumentStore`]. Every write runs the
//! resource's full rule table before it reaches the store; uniqueness is
//! left to the store and surfaces as [`RepoError::Duplicate`].
//!
//! Update semantics: fields present in the request overwrite the stored
//! ones (`null` removes a field), then the merged document is validated as
//! a whole.

mod errors;
mod record;

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event};
use crate::resources::ResourceDef;
use crate::schema::Mode;
use crate::storage::{Document, DocumentStore};

pub use errors::{RepoError, RepoResult};
pub use record::Record;

/// Validated CRUD over one collection
pub struct Repository {
    store: Arc<dyn DocumentStore>,
    resource: &'static ResourceDef,
}

impl Repository {
    /// Binds a resource to the store, creating its collection and indexes.
    pub fn open(store: Arc<dyn DocumentStore>, resource: &'static ResourceDef) -> RepoResult<Self> {
        let spec = resource.collection_spec();
        store.ensure_collection(&spec)?;

        let unique = spec.unique_fields.join(",");
        log_event_with_fields(
            Event::CollectionReady,
            &[("collection", resource.collection), ("unique", unique.as_str())],
        );
        Ok(Self { store, resource })
    }

    pub fn resource(&self) -> &'static ResourceDef {
        self.resource
    }

    /// All records, newest first.
    pub fn list(&self) -> RepoResult<Vec<Record>> {
        let docs = self.store.list(self.resource.collection)?;
        Ok(docs.into_iter().map(|d| self.to_record(d)).collect())
    }

    pub fn get_by_id(&self, id: &str) -> RepoResult<Record> {
        let id = self.parse_id(id)?;
        self.store
            .find(self.resource.collection, &id)?
            .map(|d| self.to_record(d))
            .ok_or_else(|| self.not_found())
    }

    pub fn create(&self, body: &Value) -> RepoResult<Record> {
        let now = now_millis();
        let fields = self.resource.validator().validate_at(body, Mode::Create, now)?;
        let doc = Document::new(fields, now);
        self.store.insert(self.resource.collection, &doc)?;

        let id = doc.id.to_string();
        log_event_with_fields(
            Event::RecordCreated,
            &[("collection", self.resource.collection), ("id", id.as_str())],
        );
        Ok(self.to_record(doc))
    }

    pub fn update(&self, id: &str, body: &Value) -> RepoResult<Record> {
        let id = self.parse_id(id)?;
        let patch = body.as_object().ok_or_else(|| {
            RepoError::InvalidBody("expected a JSON object".to_string())
        })?;

        let existing = self
            .store
            .find(self.resource.collection, &id)?
            .ok_or_else(|| self.not_found())?;

        let mut merged = existing.fields.clone();
        for (key, value) in patch {
            if value.is_null() {
                merged.remove(key);
            } else {
                merged.insert(key.clone(), value.clone());
            }
        }

        let now = now_millis();
        let fields = self
            .resource
            .validator()
            .validate_at(&Value::Object(merged), Mode::Update, now)?;

        let doc = Document {
            id,
            created_at: existing.created_at,
            updated_at: next_updated_at(existing.updated_at, now),
            fields,
        };
        if !self.store.replace(self.resource.collection, &doc)? {
            return Err(self.not_found());
        }

        let id = doc.id.to_string();
        log_event_with_fields(
            Event::RecordUpdated,
            &[("collection", self.resource.collection), ("id", id.as_str())],
        );
        Ok(self.to_record(doc))
    }

    pub fn delete(&self, id: &str) -> RepoResult<()> {
        let uuid = self.parse_id(id)?;
        if !self.store.remove(self.resource.collection, &uuid)? {
            return Err(self.not_found());
        }
        log_event_with_fields(
            Event::RecordDeleted,
            &[("collection", self.resource.collection), ("id", id)],
        );
        Ok(())
    }

    fn to_record(&self, doc: Document) -> Record {
        let derived = self.resource.derived(&doc.fields);
        Record {
            id: doc.id,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            fields: doc.fields,
            derived,
        }
    }

    /// Malformed identifiers cannot name a record.
    fn parse_id(&self, id: &str) -> RepoResult<Uuid> {
        Uuid::parse_str(id.trim()).map_err(|_| self.not_found())
    }

    fn not_found(&self) -> RepoError {
        RepoError::NotFound {
            label: self.resource.label,
        }
    }
}

/// Timestamps are kept at wire precision.
fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// `updatedAt` strictly advances, even when two writes land in the same
/// millisecond.
fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(previous + Duration::milliseconds(1))
}
