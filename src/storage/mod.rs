//! Document storage subsystem
//!
//! The document store is an external collaborator: it owns durability,
//! write atomicity and unique-value enforcement. Everything above it talks to
//! the [`DocumentStore`] trait.
//!
//! # Invariants
//!
//! - Every mutation is a single atomic operation
//! - Unique fields are enforced at write time; a clash is `Duplicate`
//! - `list` returns newest `created_at` first, ties broken by insertion
//!   order (newest first)
//! - Stored documents never contain derived attributes

mod document;
mod errors;
mod memory;
mod sqlite;

use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

pub use document::{CollectionSpec, Document};
pub use errors::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage operations for document collections
pub trait DocumentStore: Send + Sync {
    /// Registers a collection, creating it and its unique indexes if needed.
    fn ensure_collection(&self, spec: &CollectionSpec) -> StorageResult<()>;

    /// Inserts a new document.
    fn insert(&self, collection: &str, doc: &Document) -> StorageResult<()>;

    /// Finds a document by identifier.
    fn find(&self, collection: &str, id: &Uuid) -> StorageResult<Option<Document>>;

    /// Replaces a stored document. Returns `false` when no document has
    /// that identifier.
    fn replace(&self, collection: &str, doc: &Document) -> StorageResult<bool>;

    /// Removes a document. Returns `false` when no document has that
    /// identifier.
    fn remove(&self, collection: &str, id: &Uuid) -> StorageResult<bool>;

    /// Lists every document, newest first.
    fn list(&self, collection: &str) -> StorageResult<Vec<Document>>;
}

/// Where the store lives, parsed from a connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Process-local store, lost on exit
    Memory,
    /// SQLite database held in memory
    SqliteMemory,
    /// SQLite database file
    SqliteFile(PathBuf),
}

impl StoreLocation {
    /// Parses a connection string.
    ///
    /// Accepted forms: `memory://`, `sqlite::memory:`, `sqlite://<path>`,
    /// `sqlite:<path>`, or a bare filesystem path.
    pub fn parse(uri: &str) -> Option<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            return None;
        }
        if uri == "memory://" || uri == "memory" {
            return Some(StoreLocation::Memory);
        }
        if uri == "sqlite::memory:" || uri == ":memory:" {
            return Some(StoreLocation::SqliteMemory);
        }
        let path = uri
            .strip_prefix("sqlite://")
            .or_else(|| uri.strip_prefix("sqlite:"))
            .unwrap_or(uri);
        // Other schemes (mongodb://, postgres://, ...) are not supported
        if path.is_empty() || path.contains("://") {
            return None;
        }
        Some(StoreLocation::SqliteFile(PathBuf::from(path)))
    }
}

/// Opens the store at the given location.
pub fn open_store(location: &StoreLocation) -> StorageResult<Arc<dyn DocumentStore>> {
    Ok(match location {
        StoreLocation::Memory => Arc::new(MemoryStore::new()),
        StoreLocation::SqliteMemory => Arc::new(SqliteStore::open_in_memory()?),
        StoreLocation::SqliteFile(path) => Arc::new(SqliteStore::open(path)?),
    })
}
