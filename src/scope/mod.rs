// Scope registry: which connections are subscribed to which lobby or game.

// Public API
pub use registry::ScopeRegistry;
pub use types::{ConnectionId, Scope, ScopeError, ScopeId, ScopeKind};

// Internal modules
mod registry;
mod types;
