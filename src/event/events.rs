use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{EnumIter, IntoStaticStr};

use crate::scope::{ScopeId, ScopeKind};

/// Payload token sent with `gameClose`
pub const CLOSE_TOKEN: &str = "close";
/// Payload token sent with `gameLaunch`
pub const LAUNCH_TOKEN: &str = "launch";

/// The unit delivered to subscribers: which scope the event concerns plus the
/// event data. The event kind travels next to it as the delivery topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub scope_id: ScopeId,
    pub payload: Value,
}

impl Envelope {
    pub fn new(scope_id: ScopeId, payload: Value) -> Self {
        Self { scope_id, payload }
    }
}

/// Every lifecycle event the relay can publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum EventKind {
    PlayerJoin,
    PlayerLeave,
    PlayerReady,
    PlayerUnready,
    GameClose,
    GameLaunch,
    GameStart,
    GameEnd,
    ConfirmKills,
    PlayerConfirmKill,
}

impl EventKind {
    /// Whether the event may be published to lobby scopes as well as games
    pub fn is_player_event(&self) -> bool {
        matches!(
            self,
            EventKind::PlayerJoin
                | EventKind::PlayerLeave
                | EventKind::PlayerReady
                | EventKind::PlayerUnready
        )
    }

    /// Topic name the envelope is delivered under
    ///
    /// Player events are namespaced by scope kind (`lobbyPlayerJoin`,
    /// `gamePlayerJoin`); game-only events keep their own name.
    pub fn topic(&self, scope_kind: ScopeKind) -> &'static str {
        match (self, scope_kind) {
            (EventKind::PlayerJoin, ScopeKind::Lobby) => "lobbyPlayerJoin",
            (EventKind::PlayerJoin, ScopeKind::Game) => "gamePlayerJoin",
            (EventKind::PlayerLeave, ScopeKind::Lobby) => "lobbyPlayerLeave",
            (EventKind::PlayerLeave, ScopeKind::Game) => "gamePlayerLeave",
            (EventKind::PlayerReady, ScopeKind::Lobby) => "lobbyPlayerReady",
            (EventKind::PlayerReady, ScopeKind::Game) => "gamePlayerReady",
            (EventKind::PlayerUnready, ScopeKind::Lobby) => "lobbyPlayerUnready",
            (EventKind::PlayerUnready, ScopeKind::Game) => "gamePlayerUnready",
            (kind, _) => (*kind).into(),
        }
    }
}

/// A lifecycle event together with its kind-specific payload
///
/// Player info, end-of-game summaries and kill confirmations are relayed as
/// opaque JSON; the relay never inspects them.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    PlayerJoin { player: Value },
    PlayerLeave { player_id: String },
    PlayerReady { player_id: String },
    PlayerUnready { player_id: String },
    GameClose,
    GameLaunch,
    GameStart { start_time: Value },
    GameEnd { summary: Value },
    ConfirmKills { pending: Value },
    PlayerConfirmKill { player_id: String },
}

impl RelayEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RelayEvent::PlayerJoin { .. } => EventKind::PlayerJoin,
            RelayEvent::PlayerLeave { .. } => EventKind::PlayerLeave,
            RelayEvent::PlayerReady { .. } => EventKind::PlayerReady,
            RelayEvent::PlayerUnready { .. } => EventKind::PlayerUnready,
            RelayEvent::GameClose => EventKind::GameClose,
            RelayEvent::GameLaunch => EventKind::GameLaunch,
            RelayEvent::GameStart { .. } => EventKind::GameStart,
            RelayEvent::GameEnd { .. } => EventKind::GameEnd,
            RelayEvent::ConfirmKills { .. } => EventKind::ConfirmKills,
            RelayEvent::PlayerConfirmKill { .. } => EventKind::PlayerConfirmKill,
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            RelayEvent::PlayerJoin { player } => player,
            RelayEvent::PlayerLeave { player_id }
            | RelayEvent::PlayerReady { player_id }
            | RelayEvent::PlayerUnready { player_id }
            | RelayEvent::PlayerConfirmKill { player_id } => Value::String(player_id),
            RelayEvent::GameClose => Value::from(CLOSE_TOKEN),
            RelayEvent::GameLaunch => Value::from(LAUNCH_TOKEN),
            RelayEvent::GameStart { start_time } => start_time,
            RelayEvent::GameEnd { summary } => summary,
            RelayEvent::ConfirmKills { pending } => pending,
        }
    }
}
