//! HTTP API
//!
//! REST/JSON over HTTP, one path per record kind:
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/api/<collection>` | 200 `{success, count, data}` |
//! | GET | `/api/<collection>/:id` | 200 `{success, data}` |
//! | POST | `/api/<collection>` | 201 `{success, message, data}` |
//! | PUT | `/api/<collection>/:id` | 200 `{success, message, data}` |
//! | DELETE | `/api/<collection>/:id` | 200 `{success, message, data: {}}` |
//!
//! Failures use the same envelope with `success: false`; see [`ApiError`].

mod body;
mod errors;
mod handler;
mod response;
mod routes;
mod server;

pub use body::RecordBody;
pub use errors::{ApiError, ApiResult};
pub use handler::{RecordHandler, ResourceHandler};
pub use response::{Envelope, ErrorDetail};
pub use routes::{index_document, resource_routes, HandlerState};
pub use server::HttpServer;
