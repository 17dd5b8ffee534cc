// Lifecycle events and their fan-out to subscribed connections
//
// Event Intake calls one dispatcher method per lifecycle change; the
// dispatcher resolves the scope's subscribers and delivers a typed envelope
// to each of them.

// Public API - what other modules can use
pub use dispatcher::BroadcastDispatcher;
pub use events::{Envelope, EventKind, RelayEvent, CLOSE_TOKEN, LAUNCH_TOKEN};

// Internal modules
mod dispatcher;
mod events;
