//! # API Errors
//!
//! Error types for the HTTP boundary and their envelope mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::repository::RepoError;
use crate::schema::capitalize;

use super::response::{Envelope, ErrorDetail};

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// No record with that identifier
    #[error("{label} not found")]
    NotFound { label: &'static str },

    /// One or more rules failed
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// A unique field already holds the submitted value
    #[error("{} already exists", capitalize(.field))]
    Duplicate { field: String },

    /// Body could not be read as a field set
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// No route matched
    #[error("Route not found")]
    RouteNotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Anything else
    #[error("Server Error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Duplicate { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,

            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,

            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "RECORDHUB_API_NOT_FOUND",
            ApiError::Validation(_) => "RECORDHUB_API_VALIDATION",
            ApiError::Duplicate { .. } => "RECORDHUB_API_DUPLICATE",
            ApiError::InvalidBody(_) => "RECORDHUB_API_INVALID_BODY",
            ApiError::RouteNotFound => "RECORDHUB_API_ROUTE_NOT_FOUND",
            ApiError::Internal(_) => "RECORDHUB_API_INTERNAL",
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        match self {
            ApiError::NotFound { .. } | ApiError::RouteNotFound => {
                Envelope::failure(ErrorDetail::Message(self.to_string()), None)
            }
            ApiError::Validation(messages) => Envelope::failure(
                ErrorDetail::Messages(messages.clone()),
                Some("Validation error".to_string()),
            ),
            ApiError::Duplicate { field } => Envelope::failure(
                ErrorDetail::Message(format!("Duplicate {}", field)),
                Some(self.to_string()),
            ),
            ApiError::InvalidBody(detail) => Envelope::failure(
                ErrorDetail::Message(detail.clone()),
                Some("Invalid request body".to_string()),
            ),
            ApiError::Internal(diagnostic) => Envelope::failure(
                ErrorDetail::Message("Server Error".to_string()),
                Some(diagnostic.clone()),
            ),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { label } => ApiError::NotFound { label },
            RepoError::ValidationFailed(messages) => ApiError::Validation(messages),
            RepoError::InvalidBody(detail) => ApiError::InvalidBody(detail),
            RepoError::Duplicate { field } => ApiError::Duplicate { field },
            RepoError::Storage(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.to_envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;
    use serde_json::json;

    fn body(err: ApiError) -> serde_json::Value {
        serde_json::to_value(err.to_envelope()).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Validation(vec![]).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Duplicate { field: "email".into() }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound { label: "Note" }.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_envelopes() {
        assert_eq!(
            body(ApiError::NotFound { label: "Note" }),
            json!({"success": false, "error": "Note not found"})
        );
        assert_eq!(
            body(ApiError::Duplicate { field: "email".into() }),
            json!({"success": false, "message": "Email already exists", "error": "Duplicate email"})
        );
        assert_eq!(
            body(ApiError::Validation(vec!["Please add a title".into()])),
            json!({"success": false, "message": "Validation error", "error": ["Please add a title"]})
        );
        assert_eq!(
            body(ApiError::Internal("disk I/O error".into())),
            json!({"success": false, "error": "Server Error", "message": "disk I/O error"})
        );
    }

    #[test]
    fn test_storage_failure_is_internal() {
        let err = ApiError::from(RepoError::from(StorageError::LockPoisoned));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "RECORDHUB_API_INTERNAL");
    }
}
