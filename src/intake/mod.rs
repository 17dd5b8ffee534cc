// Event Intake: HTTP endpoints the game backend calls to report lifecycle
// changes. Each endpoint forwards to one BroadcastDispatcher operation.

// Public API
pub use handlers::router;
pub use types::{PlayerIdRequest, StartRequest};

// Internal modules
mod handlers;
mod types;
