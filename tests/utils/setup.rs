use std::sync::Arc;
use std::time::Duration;

use game_relay::{
    BroadcastDispatcher, ConnectionId, ConnectionManager, Scope, ScopeId, ScopeRegistry,
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub registry: ScopeRegistry,
    pub dispatcher: BroadcastDispatcher,
    pub mock_conn_manager: Arc<MockConnectionManager>,
}

pub struct TestSetupBuilder {
    connections: Vec<String>,
    delivery_timeout: Duration,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            connections: vec![],
            delivery_timeout: Duration::from_secs(1),
        }
    }

    pub fn with_connections(mut self, names: Vec<&str>) -> Self {
        self.connections = names.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_delivery_timeout(mut self, delivery_timeout: Duration) -> Self {
        self.delivery_timeout = delivery_timeout;
        self
    }

    pub async fn build(self) -> TestSetup {
        let registry = ScopeRegistry::new();
        let mock_conn_manager = Arc::new(MockConnectionManager::new());

        for name in &self.connections {
            mock_conn_manager.connect(&ConnectionId::from(name.as_str())).await;
        }

        let dispatcher = BroadcastDispatcher::new(registry.clone(), mock_conn_manager.clone())
            .with_delivery_timeout(self.delivery_timeout);

        TestSetup {
            registry,
            dispatcher,
            mock_conn_manager,
        }
    }
}

pub fn conn(name: &str) -> ConnectionId {
    ConnectionId::from(name)
}

pub fn scope_id(id: &str) -> ScopeId {
    ScopeId::parse(id).expect("valid scope id")
}

impl TestSetup {
    pub fn join_game(&self, name: &str, game_id: &str) {
        self.registry
            .subscribe(&conn(name), &Scope::game(scope_id(game_id)));
    }

    pub fn leave_game(&self, name: &str, game_id: &str) {
        self.registry
            .unsubscribe(&conn(name), &Scope::game(scope_id(game_id)));
    }

    pub fn join_lobby(&self, name: &str, lobby_id: &str) {
        self.registry
            .subscribe(&conn(name), &Scope::lobby(scope_id(lobby_id)));
    }

    /// What the socket glue does when a channel closes
    pub async fn disconnect(&self, name: &str) {
        self.registry.drop_connection(&conn(name));
        self.mock_conn_manager.remove_connection(&conn(name)).await;
    }
}
