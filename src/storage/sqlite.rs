//! SQLite-backed document store
//!
//! One table per collection. The document body is stored as JSON text and
//! every unique field gets an expression index over `json_extract`, so the
//! engine itself resolves uniqueness races between concurrent writers.
//!
//! Timestamps are stored as fixed-width RFC 3339 text (microseconds, UTC),
//! which sorts lexicographically in time order.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event, Logger};

use super::document::{is_identifier, CollectionSpec, Document};
use super::errors::{StorageError, StorageResult};
use super::DocumentStore;

struct Inner {
    conn: Connection,
    /// collection -> unique fields
    collections: HashMap<String, Vec<String>>,
}

/// Document store backed by a SQLite database
pub struct SqliteStore {
    inner: Mutex<Inner>,
}

type RawRow = (String, String, String, String);

impl SqliteStore {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        Self::bootstrap("file", || Connection::open(path))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::bootstrap("memory", Connection::open_in_memory)
    }

    fn bootstrap(
        mode: &str,
        open: impl FnOnce() -> rusqlite::Result<Connection>,
    ) -> StorageResult<Self> {
        let started_at = Instant::now();
        let conn = open().and_then(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            Ok(conn)
        });

        let elapsed = started_at.elapsed().as_millis().to_string();
        match conn {
            Ok(conn) => {
                log_event_with_fields(
                    Event::StoreOpened,
                    &[("engine", "sqlite"), ("mode", mode), ("duration_ms", elapsed.as_str())],
                );
                Ok(Self {
                    inner: Mutex::new(Inner {
                        conn,
                        collections: HashMap::new(),
                    }),
                })
            }
            Err(err) => {
                let message = err.to_string();
                Logger::error(
                    Event::StoreOpenFailed.as_str(),
                    &[("engine", "sqlite"), ("mode", mode), ("error", message.as_str())],
                );
                Err(err.into())
            }
        }
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl Inner {
    fn unique_fields(&self, collection: &str) -> StorageResult<&[String]> {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .ok_or_else(|| StorageError::UnknownCollection(collection.to_string()))
    }
}

fn unique_index_name(collection: &str, field: &str) -> String {
    format!("{}__unique__{}", collection, field)
}

fn format_stored_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_stored_time(s: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("bad timestamp '{}': {}", s, e)))
}

fn decode_row((id, body, created_at, updated_at): RawRow) -> StorageResult<Document> {
    let id = Uuid::parse_str(&id)
        .map_err(|e| StorageError::Corrupt(format!("bad id '{}': {}", id, e)))?;
    let fields: Map<String, Value> = serde_json::from_str(&body)?;
    Ok(Document {
        id,
        created_at: parse_stored_time(&created_at)?,
        updated_at: parse_stored_time(&updated_at)?,
        fields,
    })
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

/// Translates a unique-constraint failure into `Duplicate`.
fn map_write_error(err: rusqlite::Error, collection: &str, unique: &[String]) -> StorageError {
    if let rusqlite::Error::SqliteFailure(code, Some(message)) = &err {
        if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            let field = unique
                .iter()
                .find(|f| message.contains(&unique_index_name(collection, f)))
                .cloned()
                .unwrap_or_else(|| "_id".to_string());
            return StorageError::Duplicate {
                collection: collection.to_string(),
                field,
            };
        }
    }
    StorageError::Sqlite(err)
}

impl DocumentStore for SqliteStore {
    fn ensure_collection(&self, spec: &CollectionSpec) -> StorageResult<()> {
        if !is_identifier(&spec.name) {
            return Err(StorageError::InvalidName(spec.name.clone()));
        }
        if let Some(bad) = spec.unique_fields.iter().find(|f| !is_identifier(f)) {
            return Err(StorageError::InvalidName(bad.clone()));
        }

        let mut inner = self.lock()?;
        let mut ddl = format!(
            "CREATE TABLE IF NOT EXISTS \"{name}\" (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS \"{name}__created\" ON \"{name}\"(created_at);",
            name = spec.name
        );
        for field in &spec.unique_fields {
            ddl.push_str(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{index}\" ON \"{name}\"(json_extract(body, '$.{field}'));",
                index = unique_index_name(&spec.name, field),
                name = spec.name,
                field = field
            ));
        }
        inner.conn.execute_batch(&ddl)?;
        inner
            .collections
            .insert(spec.name.clone(), spec.unique_fields.clone());
        Ok(())
    }

    fn insert(&self, collection: &str, doc: &Document) -> StorageResult<()> {
        let inner = self.lock()?;
        let unique = inner.unique_fields(collection)?;
        let body = serde_json::to_string(&doc.fields)?;
        inner
            .conn
            .execute(
                &format!(
                    "INSERT INTO \"{}\" (id, body, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                    collection
                ),
                params![
                    doc.id.to_string(),
                    body,
                    format_stored_time(&doc.created_at),
                    format_stored_time(&doc.updated_at),
                ],
            )
            .map_err(|e| map_write_error(e, collection, unique))?;
        Ok(())
    }

    fn find(&self, collection: &str, id: &Uuid) -> StorageResult<Option<Document>> {
        let inner = self.lock()?;
        inner.unique_fields(collection)?;
        let row = inner
            .conn
            .query_row(
                &format!(
                    "SELECT id, body, created_at, updated_at FROM \"{}\" WHERE id = ?1",
                    collection
                ),
                params![id.to_string()],
                read_row,
            )
            .optional()?;
        row.map(decode_row).transpose()
    }

    fn replace(&self, collection: &str, doc: &Document) -> StorageResult<bool> {
        let inner = self.lock()?;
        let unique = inner.unique_fields(collection)?;
        let body = serde_json::to_string(&doc.fields)?;
        let changed = inner
            .conn
            .execute(
                &format!(
                    "UPDATE \"{}\" SET body = ?2, created_at = ?3, updated_at = ?4 WHERE id = ?1",
                    collection
                ),
                params![
                    doc.id.to_string(),
                    body,
                    format_stored_time(&doc.created_at),
                    format_stored_time(&doc.updated_at),
                ],
            )
            .map_err(|e| map_write_error(e, collection, unique))?;
        Ok(changed > 0)
    }

    fn remove(&self, collection: &str, id: &Uuid) -> StorageResult<bool> {
        let inner = self.lock()?;
        inner.unique_fields(collection)?;
        let changed = inner.conn.execute(
            &format!("DELETE FROM \"{}\" WHERE id = ?1", collection),
            params![id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn list(&self, collection: &str) -> StorageResult<Vec<Document>> {
        let inner = self.lock()?;
        inner.unique_fields(collection)?;
        let mut stmt = inner.conn.prepare(&format!(
            "SELECT id, body, created_at, updated_at FROM \"{}\" ORDER BY created_at DESC, seq DESC",
            collection
        ))?;
        let rows = stmt
            .query_map([], read_row)?
            .collect::<rusqlite::Result<Vec<RawRow>>>()?;
        rows.into_iter().map(decode_row).collect()
    }
}
