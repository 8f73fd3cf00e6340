//! In-process document store
//!
//! Same contract as the SQLite store, held in a `RwLock`. Unique values are
//! checked under the write lock, so concurrent writers cannot both win.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use super::document::{is_identifier, CollectionSpec, Document};
use super::errors::{StorageError, StorageResult};
use super::DocumentStore;

#[derive(Debug, Default)]
struct Collection {
    unique_fields: Vec<String>,
    /// (insertion sequence, document)
    documents: Vec<(u64, Document)>,
    next_seq: u64,
}

impl Collection {
    /// Returns the first unique field `doc` would clash on.
    fn clash(&self, doc: &Document) -> Option<&str> {
        self.unique_fields
            .iter()
            .find(|field| {
                let Some(value) = doc.fields.get(field.as_str()).filter(|v| !v.is_null()) else {
                    return false;
                };
                self.documents.iter().any(|(_, other)| {
                    other.id != doc.id && other.fields.get(field.as_str()) == Some(value)
                })
            })
            .map(String::as_str)
    }
}

/// Document store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(
        &self,
        collection: &str,
        f: impl FnOnce(&Collection) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        let coll = collections
            .get(collection)
            .ok_or_else(|| StorageError::UnknownCollection(collection.to_string()))?;
        f(coll)
    }

    fn write<T>(
        &self,
        collection: &str,
        f: impl FnOnce(&mut Collection) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| StorageError::UnknownCollection(collection.to_string()))?;
        f(coll)
    }
}

fn duplicate(collection: &str, field: &str) -> StorageError {
    StorageError::Duplicate {
        collection: collection.to_string(),
        field: field.to_string(),
    }
}

impl DocumentStore for MemoryStore {
    fn ensure_collection(&self, spec: &CollectionSpec) -> StorageResult<()> {
        if !is_identifier(&spec.name) {
            return Err(StorageError::InvalidName(spec.name.clone()));
        }
        if let Some(bad) = spec.unique_fields.iter().find(|f| !is_identifier(f)) {
            return Err(StorageError::InvalidName(bad.clone()));
        }

        let mut collections = self
            .collections
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        let coll = collections.entry(spec.name.clone()).or_default();
        for field in &spec.unique_fields {
            if !coll.unique_fields.contains(field) {
                coll.unique_fields.push(field.clone());
            }
        }
        Ok(())
    }

    fn insert(&self, collection: &str, doc: &Document) -> StorageResult<()> {
        self.write(collection, |coll| {
            if coll.documents.iter().any(|(_, d)| d.id == doc.id) {
                return Err(duplicate(collection, "_id"));
            }
            if let Some(field) = coll.clash(doc) {
                return Err(duplicate(collection, field));
            }
            let seq = coll.next_seq;
            coll.next_seq += 1;
            coll.documents.push((seq, doc.clone()));
            Ok(())
        })
    }

    fn find(&self, collection: &str, id: &Uuid) -> StorageResult<Option<Document>> {
        self.read(collection, |coll| {
            Ok(coll
                .documents
                .iter()
                .find(|(_, d)| &d.id == id)
                .map(|(_, d)| d.clone()))
        })
    }

    fn replace(&self, collection: &str, doc: &Document) -> StorageResult<bool> {
        self.write(collection, |coll| {
            if let Some(field) = coll.clash(doc) {
                return Err(duplicate(collection, field));
            }
            match coll.documents.iter_mut().find(|(_, d)| d.id == doc.id) {
                Some((_, stored)) => {
                    *stored = doc.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn remove(&self, collection: &str, id: &Uuid) -> StorageResult<bool> {
        self.write(collection, |coll| {
            let before = coll.documents.len();
            coll.documents.retain(|(_, d)| &d.id != id);
            Ok(coll.documents.len() != before)
        })
    }

    fn list(&self, collection: &str) -> StorageResult<Vec<Document>> {
        self.read(collection, |coll| {
            let mut entries: Vec<&(u64, Document)> = coll.documents.iter().collect();
            entries.sort_by(|(seq_a, a), (seq_b, b)| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| seq_b.cmp(seq_a))
            });
            Ok(entries.into_iter().map(|(_, d)| d.clone()).collect())
        })
    }
}
