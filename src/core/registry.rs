//! Connection registry
//! Concurrent-safe bookkeeping of live connections, keyed two ways:
//! by connection identity and by user identity

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::RwLock;
use warp::ws::Message;

use crate::core::connection::Connection;

/// Both maps behind one lock, so a registration or removal is atomic as
/// seen from any reader and the maps can never be observed out of step.
#[derive(Default)]
struct RegistryInner {
    /// Every tracked connection, keyed by connection id.
    connections: HashMap<String, Arc<Connection>>,
    /// Latest connection per user id. A reconnect overwrites this entry
    /// while the previous connection stays in `connections` until it
    /// disconnects on its own.
    by_user: HashMap<String, Arc<Connection>>,
}

/// Tracks which connection belongs to which user.
///
/// Reads (lookup, snapshot, count) take the read lock and run
/// concurrently; writes (register, unregister) are rare connect and
/// disconnect events. Callers never need external locking.
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: RwLock<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection for a user.
    ///
    /// If the user already had a connection, the user lookup now resolves
    /// to the new one; the old connection remains in the broadcast set
    /// until its own disconnect fires. Unicast after a reconnect therefore
    /// reaches only the newest connection.
    pub async fn register(
        &self,
        user_id: String,
        sender: mpsc::UnboundedSender<Message>,
    ) -> Arc<Connection> {
        let connection = Arc::new(Connection::new(user_id.clone(), sender));

        let mut inner = self.inner.write().await;
        inner
            .connections
            .insert(connection.id.clone(), connection.clone());
        inner.by_user.insert(user_id, connection.clone());

        connection
    }

    /// Remove a connection from the registry.
    ///
    /// The user lookup entry is removed only if it still points at this
    /// exact connection, so a stale unregister racing a reconnect never
    /// evicts the newer connection registered under the same user id.
    pub async fn unregister(&self, connection: &Connection) {
        let mut inner = self.inner.write().await;
        inner.connections.remove(&connection.id);

        let current = inner
            .by_user
            .get(&connection.user_id)
            .map(|c| c.id == connection.id)
            .unwrap_or(false);
        if current {
            inner.by_user.remove(&connection.user_id);
        }
    }

    /// Current connection for a user, if any
    pub async fn lookup(&self, user_id: &str) -> Option<Arc<Connection>> {
        let inner = self.inner.read().await;
        inner.by_user.get(user_id).cloned()
    }

    /// Stable snapshot of every tracked connection. Safe to iterate while
    /// other tasks register and unregister; registrations that happen
    /// after the snapshot are not part of it.
    pub async fn all_active(&self) -> Vec<Arc<Connection>> {
        let inner = self.inner.read().await;
        inner.connections.values().cloned().collect()
    }

    /// Current count of tracked connections
    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.connections.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether a user currently has a registered connection
    pub async fn is_user_online(&self, user_id: &str) -> bool {
        let inner = self.inner.read().await;
        inner.by_user.contains_key(user_id)
    }
}

// Shared reference handed to the transport and application layers
pub type Registry = Arc<ConnectionRegistry>;

/// Create a new shared registry
pub fn create_registry() -> Registry {
    Arc::new(ConnectionRegistry::new())
}
