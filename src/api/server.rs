//! # HTTP Server
//!
//! Builds the router over every resource and serves it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::HttpConfig;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::repository::{RepoResult, Repository};
use crate::resources;
use crate::storage::DocumentStore;

use super::handler::ResourceHandler;
use super::routes::{index_document, resource_routes, service_routes, HandlerState};

/// HTTP server for the record APIs
pub struct HttpServer {
    config: HttpConfig,
    router: Router,
}

impl HttpServer {
    /// Opens a repository per resource on `store` and builds the router.
    pub fn with_store(config: HttpConfig, store: Arc<dyn DocumentStore>) -> RepoResult<Self> {
        let mut handlers: Vec<HandlerState> = Vec::new();
        for resource in resources::all() {
            let repo = Repository::open(Arc::clone(&store), resource)?;
            handlers.push(Arc::new(ResourceHandler::new(repo)));
        }
        Ok(Self::with_handlers(config, handlers))
    }

    /// Builds the router over already-constructed handlers.
    pub fn with_handlers(config: HttpConfig, handlers: Vec<HandlerState>) -> Self {
        let router = Self::build_router(&config, handlers);
        Self { config, router }
    }

    fn build_router(config: &HttpConfig, handlers: Vec<HandlerState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let index = index_document(&handlers);
        let mut router = Router::new();
        for handler in handlers {
            router = router.merge(resource_routes(handler));
        }

        router
            .merge(service_routes(index))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serves until Ctrl-C.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?.to_string();
        log_event_with_fields(Event::Serving, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

async fn shutdown_signal() {
    // A failed signal handler leaves the server running until killed
    if tokio::signal::ctrl_c().await.is_ok() {
        log_event(Event::ShutdownStart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_server_with_custom_port() {
        let server =
            HttpServer::with_store(HttpConfig::with_port(8080), Arc::new(MemoryStore::new()))
                .unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_restricted_cors_builds() {
        let config = HttpConfig {
            cors_origins: vec!["http://localhost:5173".into()],
            ..HttpConfig::default()
        };
        let server = HttpServer::with_store(config, Arc::new(MemoryStore::new())).unwrap();
        let _router = server.router();
    }
}
