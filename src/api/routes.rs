//! HTTP routes
//!
//! Each resource is mounted under `/api/<collection>` with the five CRUD
//! routes. Handlers run on the blocking pool since the store is
//! synchronous. A method a path does not serve answers like an unknown
//! path.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use super::body::RecordBody;
use super::errors::{ApiError, ApiResult};
use super::handler::RecordHandler;
use super::response::Envelope;

/// Shared state type
pub type HandlerState = Arc<dyn RecordHandler>;

/// The five CRUD routes for one resource, under its base path.
///
/// The collection path is also served with a trailing slash.
pub fn resource_routes(handler: HandlerState) -> Router {
    let base = handler.resource().base_path();
    let collection = get(list_handler)
        .post(create_handler)
        .fallback(fallback_handler);
    let item = get(get_handler)
        .put(update_handler)
        .delete(delete_handler)
        .fallback(fallback_handler);

    Router::new()
        .route(&base, collection.clone())
        .route(&format!("{}/", base), collection)
        .route(&format!("{}/:id", base), item)
        .with_state(handler)
}

async fn blocking<F>(handler: HandlerState, f: F) -> ApiResult<Envelope>
where
    F: FnOnce(&dyn RecordHandler) -> ApiResult<Envelope> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(handler.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

async fn list_handler(State(handler): State<HandlerState>) -> ApiResult<Json<Envelope>> {
    blocking(handler, |h| h.list()).await.map(Json)
}

async fn get_handler(
    State(handler): State<HandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope>> {
    blocking(handler, move |h| h.get(&id)).await.map(Json)
}

async fn create_handler(
    State(handler): State<HandlerState>,
    RecordBody(body): RecordBody,
) -> ApiResult<(StatusCode, Json<Envelope>)> {
    let envelope = blocking(handler, move |h| h.create(body)).await?;
    Ok((StatusCode::CREATED, Json(envelope)))
}

async fn update_handler(
    State(handler): State<HandlerState>,
    Path(id): Path<String>,
    RecordBody(body): RecordBody,
) -> ApiResult<Json<Envelope>> {
    blocking(handler, move |h| h.update(&id, body)).await.map(Json)
}

async fn delete_handler(
    State(handler): State<HandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope>> {
    blocking(handler, move |h| h.delete(&id)).await.map(Json)
}

/// Welcome document listing every mounted route
pub fn index_document(handlers: &[HandlerState]) -> Value {
    let mut endpoints = Map::new();
    for handler in handlers {
        let resource = handler.resource();
        let base = resource.base_path();
        let plural = resource.collection;
        let singular = resource.label.to_lowercase();

        let routes = [
            (format!("GET {}", base), format!("Get all {}", plural)),
            (format!("GET {}/:id", base), format!("Get {} by ID", singular)),
            (format!("POST {}", base), format!("Create new {}", singular)),
            (format!("PUT {}/:id", base), format!("Update {} by ID", singular)),
            (format!("DELETE {}/:id", base), format!("Delete {} by ID", singular)),
        ];
        for (route, description) in routes {
            endpoints.insert(route, Value::String(description));
        }
    }

    json!({
        "message": "Welcome to Records API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
    })
}

/// `GET /`, `GET /health` and the not-found fallback
pub fn service_routes(index: Value) -> Router {
    let index = Arc::new(index);
    Router::new()
        .route(
            "/",
            get(move || {
                let index = Arc::clone(&index);
                async move { Json(index.as_ref().clone()) }
            })
            .fallback(fallback_handler),
        )
        .route("/health", get(health_handler).fallback(fallback_handler))
        .fallback(fallback_handler)
}

async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn fallback_handler() -> ApiError {
    ApiError::RouteNotFound
}
