use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::event::BroadcastDispatcher;
use crate::scope::{ScopeError, ScopeRegistry};
use crate::websockets::{ConnectionManager, InMemoryConnectionManager};

/// Shared application state containing all dependencies
///
/// Both listeners get a clone; the registry and connection manager inside are
/// the single process-wide instances.
#[derive(Clone)]
pub struct AppState {
    pub registry: ScopeRegistry,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub dispatcher: BroadcastDispatcher,
}

impl AppState {
    pub fn new(
        registry: ScopeRegistry,
        connection_manager: Arc<dyn ConnectionManager>,
        delivery_timeout: Duration,
    ) -> Self {
        let dispatcher = BroadcastDispatcher::new(registry.clone(), connection_manager.clone())
            .with_delivery_timeout(delivery_timeout);
        Self {
            registry,
            connection_manager,
            dispatcher,
        }
    }

    /// Fresh registry and in-memory connection manager
    pub fn in_memory(delivery_timeout: Duration) -> Self {
        Self::new(
            ScopeRegistry::new(),
            Arc::new(InMemoryConnectionManager::new()),
            delivery_timeout,
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    InvalidScope(#[from] ScopeError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidScope(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        registry: Option<ScopeRegistry>,
        delivery_timeout: Duration,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                registry: None,
                delivery_timeout: Duration::from_millis(200),
            }
        }

        pub fn with_registry(mut self, registry: ScopeRegistry) -> Self {
            self.registry = Some(registry);
            self
        }

        pub fn build(self) -> AppState {
            AppState::new(
                self.registry.unwrap_or_default(),
                Arc::new(InMemoryConnectionManager::new()),
                self.delivery_timeout,
            )
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
