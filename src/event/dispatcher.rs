use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::events::{Envelope, RelayEvent};
use crate::scope::{ConnectionId, Scope, ScopeId, ScopeKind, ScopeRegistry};
use crate::websockets::{ConnectionManager, OutboundMessage};

/// Fans lifecycle events out to every connection subscribed to the target scope
///
/// There is one publish method per event kind. Each one:
/// - wraps the payload in an [`Envelope`]
/// - snapshots the scope's subscribers from the [`ScopeRegistry`]
/// - hands the envelope to each subscriber as an independent delivery
///
/// Deliveries are fire-and-forget: a failed or slow recipient is logged and
/// skipped, and publishing to a scope nobody watches is a no-op. The
/// dispatcher only reads the registry.
#[derive(Clone)]
pub struct BroadcastDispatcher {
    registry: ScopeRegistry,
    connection_manager: Arc<dyn ConnectionManager>,
    delivery_timeout: Duration,
}

impl BroadcastDispatcher {
    pub fn new(registry: ScopeRegistry, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            registry,
            connection_manager,
            delivery_timeout: Duration::from_secs(5),
        }
    }

    /// Upper bound on a single recipient's delivery attempt
    pub fn with_delivery_timeout(mut self, delivery_timeout: Duration) -> Self {
        self.delivery_timeout = delivery_timeout;
        self
    }

    pub async fn player_join(&self, kind: ScopeKind, scope_id: &ScopeId, player: Value) {
        self.publish(Scope::new(kind, scope_id.clone()), RelayEvent::PlayerJoin { player })
            .await;
    }

    pub async fn player_leave(&self, kind: ScopeKind, scope_id: &ScopeId, player_id: &str) {
        let event = RelayEvent::PlayerLeave {
            player_id: player_id.to_string(),
        };
        self.publish(Scope::new(kind, scope_id.clone()), event).await;
    }

    pub async fn player_ready(&self, kind: ScopeKind, scope_id: &ScopeId, player_id: &str) {
        let event = RelayEvent::PlayerReady {
            player_id: player_id.to_string(),
        };
        self.publish(Scope::new(kind, scope_id.clone()), event).await;
    }

    pub async fn player_unready(&self, kind: ScopeKind, scope_id: &ScopeId, player_id: &str) {
        let event = RelayEvent::PlayerUnready {
            player_id: player_id.to_string(),
        };
        self.publish(Scope::new(kind, scope_id.clone()), event).await;
    }

    pub async fn game_close(&self, game_id: &ScopeId) {
        self.publish(Scope::game(game_id.clone()), RelayEvent::GameClose)
            .await;
    }

    pub async fn game_launch(&self, game_id: &ScopeId) {
        self.publish(Scope::game(game_id.clone()), RelayEvent::GameLaunch)
            .await;
    }

    pub async fn game_start(&self, game_id: &ScopeId, start_time: Value) {
        self.publish(
            Scope::game(game_id.clone()),
            RelayEvent::GameStart { start_time },
        )
        .await;
    }

    pub async fn game_end(&self, game_id: &ScopeId, summary: Value) {
        self.publish(Scope::game(game_id.clone()), RelayEvent::GameEnd { summary })
            .await;
    }

    pub async fn confirm_kills(&self, game_id: &ScopeId, pending: Value) {
        self.publish(
            Scope::game(game_id.clone()),
            RelayEvent::ConfirmKills { pending },
        )
        .await;
    }

    pub async fn player_confirm_kill(&self, game_id: &ScopeId, player_id: &str) {
        let event = RelayEvent::PlayerConfirmKill {
            player_id: player_id.to_string(),
        };
        self.publish(Scope::game(game_id.clone()), event).await;
    }

    async fn publish(&self, scope: Scope, event: RelayEvent) {
        let topic = event.kind().topic(scope.kind);
        let subscribers = self.registry.subscribers_of(&scope);

        if subscribers.is_empty() {
            debug!(scope = %scope, topic = topic, "Published to scope with no subscribers");
            return;
        }

        let envelope = Arc::new(Envelope::new(scope.id.clone(), event.into_payload()));
        let message = OutboundMessage::new(topic, envelope);

        let deliveries = subscribers
            .iter()
            .map(|connection_id| self.deliver(connection_id, message.clone()));
        let delivered = join_all(deliveries)
            .await
            .into_iter()
            .filter(|ok| *ok)
            .count();

        debug!(
            scope = %scope,
            topic = topic,
            subscribers = subscribers.len(),
            delivered = delivered,
            "Event published"
        );
    }

    async fn deliver(&self, connection_id: &ConnectionId, message: OutboundMessage) -> bool {
        let topic = message.topic;
        match timeout(
            self.delivery_timeout,
            self.connection_manager
                .send_to_connection(connection_id, message),
        )
        .await
        {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(
                    connection_id = %connection_id,
                    topic = topic,
                    error = %e,
                    "Delivery failed"
                );
                false
            }
            Err(_) => {
                warn!(
                    connection_id = %connection_id,
                    topic = topic,
                    timeout_ms = self.delivery_timeout.as_millis() as u64,
                    "Delivery timed out"
                );
                false
            }
        }
    }
}
