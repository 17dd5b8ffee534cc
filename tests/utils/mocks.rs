use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

use game_relay::websockets::{ConnectionManager, DeliveryError, OutboundMessage};
use game_relay::ConnectionId;

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// A delivered frame as the client would see it: topic plus envelope JSON
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub topic: String,
    pub envelope: Value,
}

#[derive(Clone, Default)]
pub struct MockConnectionManager {
    delivered: Arc<RwLock<HashMap<ConnectionId, Vec<Delivery>>>>,
    connected: Arc<RwLock<HashSet<ConnectionId>>>,
    failing: Arc<RwLock<HashSet<ConnectionId>>>,
    delays: Arc<RwLock<HashMap<ConnectionId, Duration>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn connect(&self, connection_id: &ConnectionId) {
        self.connected.write().await.insert(connection_id.clone());
    }

    /// Every send to this connection fails as if its channel had closed
    pub async fn fail_deliveries_to(&self, connection_id: &ConnectionId) {
        self.failing.write().await.insert(connection_id.clone());
    }

    /// Every send to this connection stalls for `delay` first
    pub async fn delay_deliveries_to(&self, connection_id: &ConnectionId, delay: Duration) {
        self.delays
            .write()
            .await
            .insert(connection_id.clone(), delay);
    }

    pub async fn deliveries_for(&self, connection_id: &ConnectionId) -> Vec<Delivery> {
        self.delivered
            .read()
            .await
            .get(connection_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(
        &self,
        connection_id: ConnectionId,
        _sender: mpsc::UnboundedSender<OutboundMessage>,
    ) {
        self.connect(&connection_id).await;
    }

    async fn remove_connection(&self, connection_id: &ConnectionId) {
        self.connected.write().await.remove(connection_id);
    }

    async fn send_to_connection(
        &self,
        connection_id: &ConnectionId,
        message: OutboundMessage,
    ) -> Result<(), DeliveryError> {
        let delay = self.delays.read().await.get(connection_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.read().await.contains(connection_id) {
            return Err(DeliveryError::ChannelClosed(connection_id.clone()));
        }
        if !self.connected.read().await.contains(connection_id) {
            return Err(DeliveryError::UnknownConnection(connection_id.clone()));
        }

        let delivery = Delivery {
            topic: message.topic.to_string(),
            envelope: serde_json::to_value(message.envelope.as_ref())
                .expect("envelope serializes"),
        };
        self.delivered
            .write()
            .await
            .entry(connection_id.clone())
            .or_default()
            .push(delivery);
        Ok(())
    }

    async fn connection_count(&self) -> usize {
        self.connected.read().await.len()
    }
}
