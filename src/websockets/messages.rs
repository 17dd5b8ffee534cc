use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::event::Envelope;
use crate::scope::{Scope, ScopeId, ScopeKind};

/// Subscription requests a client can send over its socket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    JoinLobby,
    LeaveLobby,
    JoinGame,
    LeaveGame,
}

impl MessageType {
    pub fn scope_kind(&self) -> ScopeKind {
        match self {
            MessageType::JoinLobby | MessageType::LeaveLobby => ScopeKind::Lobby,
            MessageType::JoinGame | MessageType::LeaveGame => ScopeKind::Game,
        }
    }

    pub fn is_join(&self) -> bool {
        matches!(self, MessageType::JoinLobby | MessageType::JoinGame)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    pub scope_id: ScopeId,
}

/// Inbound client message, e.g. `{"type": "joinGame", "payload": {"scopeId": "G1"}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: SubscriptionPayload,
}

impl WebSocketMessage {
    pub fn new(message_type: MessageType, scope_id: ScopeId) -> Self {
        Self {
            message_type,
            payload: SubscriptionPayload { scope_id },
        }
    }

    pub fn scope(&self) -> Scope {
        Scope::new(
            self.message_type.scope_kind(),
            self.payload.scope_id.clone(),
        )
    }
}

/// Metadata attached to every outbound frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMeta {
    pub timestamp: DateTime<Utc>,
}

/// An envelope on its way to one connection, tagged with its topic.
/// The envelope itself is shared by every recipient of the same publish.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub topic: &'static str,
    pub envelope: Arc<Envelope>,
    pub meta: OutboundMeta,
}

#[derive(Serialize)]
struct OutboundFrame<'a> {
    #[serde(rename = "type")]
    topic: &'a str,
    payload: &'a Envelope,
    meta: &'a OutboundMeta,
}

impl OutboundMessage {
    pub fn new(topic: &'static str, envelope: Arc<Envelope>) -> Self {
        Self {
            topic,
            envelope,
            meta: OutboundMeta {
                timestamp: Utc::now(),
            },
        }
    }

    /// Wire form: `{"type": topic, "payload": {"scopeId": .., "payload": ..}, "meta": {..}}`
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&OutboundFrame {
            topic: self.topic,
            payload: self.envelope.as_ref(),
            meta: &self.meta,
        })
    }
}
