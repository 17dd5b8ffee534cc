use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use super::types::{ConnectionId, Scope};

/// Registry of scope subscriptions for every live connection
///
/// Scopes exist only while they have subscribers: the first subscribe creates
/// the entry and the last unsubscribe prunes it. Both maps lock per shard, so
/// traffic on unrelated scopes does not contend.
///
/// Calls for a single connection are expected to come from that connection's
/// task in order (join/leave messages, then exactly one `drop_connection`).
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    /// scope -> subscribed connections
    scopes: Arc<DashMap<Scope, HashSet<ConnectionId>>>,
    /// connection -> scopes it joined
    memberships: Arc<DashMap<ConnectionId, HashSet<Scope>>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the connection to the scope. Returns false if it was already there.
    pub fn subscribe(&self, connection_id: &ConnectionId, scope: &Scope) -> bool {
        let added = self
            .scopes
            .entry(scope.clone())
            .or_default()
            .insert(connection_id.clone());

        if added {
            self.memberships
                .entry(connection_id.clone())
                .or_default()
                .insert(scope.clone());
        }

        debug!(
            connection_id = %connection_id,
            scope = %scope,
            added = added,
            "Subscribe"
        );
        added
    }

    /// Removes the connection from the scope. Returns false if it was not there.
    pub fn unsubscribe(&self, connection_id: &ConnectionId, scope: &Scope) -> bool {
        let removed = self.remove_from_scope(connection_id, scope);

        if removed {
            if let Some(mut joined) = self.memberships.get_mut(connection_id) {
                joined.remove(scope);
            }
            self.memberships
                .remove_if(connection_id, |_, joined| joined.is_empty());
        }

        debug!(
            connection_id = %connection_id,
            scope = %scope,
            removed = removed,
            "Unsubscribe"
        );
        removed
    }

    /// Removes the connection from every scope it joined and returns how many
    /// subscriptions were dropped.
    pub fn drop_connection(&self, connection_id: &ConnectionId) -> usize {
        let Some((_, joined)) = self.memberships.remove(connection_id) else {
            debug!(connection_id = %connection_id, "Dropped connection had no subscriptions");
            return 0;
        };

        let dropped = joined
            .iter()
            .filter(|scope| self.remove_from_scope(connection_id, scope))
            .count();

        info!(
            connection_id = %connection_id,
            dropped = dropped,
            "Connection dropped from all scopes"
        );
        dropped
    }

    /// Snapshot of the scope's current subscribers. Empty for unknown scopes.
    pub fn subscribers_of(&self, scope: &Scope) -> Vec<ConnectionId> {
        self.scopes
            .get(scope)
            .map(|subscribers| subscribers.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn scopes_of(&self, connection_id: &ConnectionId) -> Vec<Scope> {
        self.memberships
            .get(connection_id)
            .map(|joined| joined.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_subscribed(&self, connection_id: &ConnectionId, scope: &Scope) -> bool {
        self.scopes
            .get(scope)
            .map(|subscribers| subscribers.contains(connection_id))
            .unwrap_or(false)
    }

    /// Number of scopes that currently have at least one subscriber.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    fn remove_from_scope(&self, connection_id: &ConnectionId, scope: &Scope) -> bool {
        // The shard guard must be released before `remove_if` locks it again.
        let removed = match self.scopes.get_mut(scope) {
            Some(mut subscribers) => subscribers.remove(connection_id),
            None => false,
        };

        if removed && self.scopes.remove_if(scope, |_, s| s.is_empty()).is_some() {
            debug!(scope = %scope, "Pruned empty scope");
        }
        removed
    }
}
