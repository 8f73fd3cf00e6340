//! # Record Handler
//!
//! Translates one request into one repository call and wraps the outcome
//! in an [`Envelope`].

use serde_json::Value;

use crate::observability::{Event, Logger};
use crate::repository::{RepoError, Repository};
use crate::resources::ResourceDef;

use super::errors::{ApiError, ApiResult};
use super::response::Envelope;

/// Handler trait for one record collection
pub trait RecordHandler: Send + Sync {
    fn resource(&self) -> &'static ResourceDef;

    /// List records, newest first
    fn list(&self) -> ApiResult<Envelope>;

    /// Get a single record by ID
    fn get(&self, id: &str) -> ApiResult<Envelope>;

    /// Create a record
    fn create(&self, body: Value) -> ApiResult<Envelope>;

    /// Update a record
    fn update(&self, id: &str, body: Value) -> ApiResult<Envelope>;

    /// Delete a record
    fn delete(&self, id: &str) -> ApiResult<Envelope>;
}

/// Handler backed by a [`Repository`]
pub struct ResourceHandler {
    repo: Repository,
}

impl ResourceHandler {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    fn label(&self) -> &'static str {
        self.repo.resource().label
    }

    /// Rejects a body that already breaks a cross-field rule before any
    /// store access. The validator repeats the same check.
    fn fast_reject(&self, body: &Value) -> ApiResult<()> {
        let Some(fields) = body.as_object() else {
            return Ok(());
        };
        for rule in &self.repo.resource().schema.cross_field {
            if let Err(message) = rule.check(fields) {
                return Err(ApiError::Validation(vec![message.to_string()]));
            }
        }
        Ok(())
    }

    /// Logs a client-caused failure and passes it on.
    fn reject(&self, op: &str, code: &str, err: ApiError) -> ApiError {
        Logger::warn(
            Event::RecordRejected.as_str(),
            &[
                ("code", code),
                ("collection", self.repo.resource().collection),
                ("op", op),
            ],
        );
        err
    }

    fn repo_fail(&self, op: &str, err: RepoError) -> ApiError {
        if err.is_rejection() {
            let code = err.code();
            return self.reject(op, code, ApiError::from(err));
        }
        let diagnostic = err.to_string();
        Logger::error(
            Event::RequestFailed.as_str(),
            &[
                ("code", err.code()),
                ("collection", self.repo.resource().collection),
                ("error", diagnostic.as_str()),
                ("op", op),
            ],
        );
        ApiError::from(err)
    }
}

impl RecordHandler for ResourceHandler {
    fn resource(&self) -> &'static ResourceDef {
        self.repo.resource()
    }

    fn list(&self) -> ApiResult<Envelope> {
        let records = self.repo.list().map_err(|e| self.repo_fail("list", e))?;
        Ok(Envelope::list(&records))
    }

    fn get(&self, id: &str) -> ApiResult<Envelope> {
        let record = self.repo.get_by_id(id).map_err(|e| self.repo_fail("get", e))?;
        Ok(Envelope::record(&record))
    }

    fn create(&self, body: Value) -> ApiResult<Envelope> {
        self.fast_reject(&body)
            .map_err(|e| self.reject("create", e.code(), e))?;
        let record = self
            .repo
            .create(&body)
            .map_err(|e| self.repo_fail("create", e))?;
        Ok(Envelope::created(self.label(), &record))
    }

    fn update(&self, id: &str, body: Value) -> ApiResult<Envelope> {
        self.fast_reject(&body)
            .map_err(|e| self.reject("update", e.code(), e))?;
        let record = self
            .repo
            .update(id, &body)
            .map_err(|e| self.repo_fail("update", e))?;
        Ok(Envelope::updated(self.label(), &record))
    }

    fn delete(&self, id: &str) -> ApiResult<Envelope> {
        self.repo.delete(id).map_err(|e| self.repo_fail("delete", e))?;
        Ok(Envelope::deleted(self.label()))
    }
}
