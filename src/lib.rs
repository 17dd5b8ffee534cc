// Library crate for the game notification relay
// This file exposes the public API for integration tests

pub mod config;
pub mod event;
pub mod intake;
pub mod scope;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::RelayConfig;
pub use event::{BroadcastDispatcher, Envelope, EventKind};
pub use scope::{ConnectionId, Scope, ScopeId, ScopeKind, ScopeRegistry};
pub use shared::{AppError, AppState};
pub use websockets::{ConnectionManager, InMemoryConnectionManager, OutboundMessage};
