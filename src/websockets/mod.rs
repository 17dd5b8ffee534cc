// Public API
pub use connection_manager::{ConnectionManager, DeliveryError, InMemoryConnectionManager};
pub use handler::{serve_connection, websocket_handler, SubscriptionMessageHandler};
pub use messages::{MessageType, OutboundMessage, WebSocketMessage};
pub use socket::{Connection, MessageHandler, SocketError, SocketWrapper};

// Internal modules
mod connection_manager;
mod handler;
mod messages;
mod socket;
