use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};

use super::messages::OutboundMessage;
use crate::scope::ConnectionId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("Unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    #[error("Outbound channel closed for connection: {0}")]
    ChannelClosed(ConnectionId),
}

/// Owns the outbound side of every live connection
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::UnboundedSender<OutboundMessage>,
    );

    async fn remove_connection(&self, connection_id: &ConnectionId);

    /// Queue a message for one connection. Must not block on the socket.
    async fn send_to_connection(
        &self,
        connection_id: &ConnectionId,
        message: OutboundMessage,
    ) -> Result<(), DeliveryError>;

    async fn connection_count(&self) -> usize;
}

pub struct InMemoryConnectionManager {
    // connection id -> outbound sender
    connections: Arc<RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<OutboundMessage>>>>,
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::UnboundedSender<OutboundMessage>,
    ) {
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, sender);
    }

    async fn remove_connection(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.write().await;
        connections.remove(connection_id);
    }

    async fn send_to_connection(
        &self,
        connection_id: &ConnectionId,
        message: OutboundMessage,
    ) -> Result<(), DeliveryError> {
        let connections = self.connections.read().await;
        let sender = connections
            .get(connection_id)
            .ok_or_else(|| DeliveryError::UnknownConnection(connection_id.clone()))?;

        sender
            .send(message)
            .map_err(|_| DeliveryError::ChannelClosed(connection_id.clone()))
    }

    async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}
