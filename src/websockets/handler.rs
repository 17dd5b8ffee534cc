use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::messages::{OutboundMessage, WebSocketMessage};
use super::socket::{Connection, MessageHandler, SocketWrapper};
use crate::scope::{ConnectionId, ScopeRegistry};
use crate::shared::AppState;

/// Turns join/leave requests from a client into registry subscriptions
pub struct SubscriptionMessageHandler {
    registry: ScopeRegistry,
}

impl SubscriptionMessageHandler {
    pub fn new(registry: ScopeRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl MessageHandler for SubscriptionMessageHandler {
    async fn handle_message(&self, connection_id: &ConnectionId, message: String) {
        debug!(
            connection_id = %connection_id,
            message = %message,
            "Received message"
        );

        let ws_message = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => ws_message,
            Err(e) => {
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                return;
            }
        };

        let scope = ws_message.scope();
        if ws_message.message_type.is_join() {
            self.registry.subscribe(connection_id, &scope);
            info!(connection_id = %connection_id, scope = %scope, "Socket joined scope");
        } else {
            self.registry.unsubscribe(connection_id, &scope);
            info!(connection_id = %connection_id, scope = %scope, "Socket left scope");
        }
    }
}

/// WebSocket endpoint for real-time subscribers
///
/// GET /ws
/// Clients join and leave lobbies and games with `joinLobby`, `leaveLobby`,
/// `joinGame` and `leaveGame` messages on the open socket.
#[instrument(name = "websocket_handler", skip(ws, app_state))]
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    let connection_id = ConnectionId::new();
    info!(connection_id = %connection_id, "Caught new socket connection");

    ws.on_upgrade(move |socket| serve_connection(Box::new(socket), connection_id, app_state))
}

/// Drive one connection from registration to cleanup
///
/// Whatever ends the connection, its subscriptions are dropped exactly once
/// and its outbound sender is unregistered.
pub async fn serve_connection(
    socket: Box<dyn SocketWrapper>,
    connection_id: ConnectionId,
    app_state: AppState,
) {
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<OutboundMessage>();

    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    let message_handler = Arc::new(SubscriptionMessageHandler::new(app_state.registry.clone()));
    let connection = Connection::new(
        connection_id.clone(),
        socket,
        outbound_receiver,
        message_handler,
    );

    match connection.run().await {
        Ok(()) => {
            info!(connection_id = %connection_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = %e,
                "WebSocket connection error"
            );
        }
    }

    app_state.registry.drop_connection(&connection_id);
    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;
}
