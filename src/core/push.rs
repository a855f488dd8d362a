//! Delivery engine built on top of the connection registry
//! Broadcast, unicast and multicast submission of text messages

use std::sync::Arc;

use log::{debug, info};

use crate::core::registry::Registry;
use crate::metrics::{create_default_observer, PushObserver};

/// Fan-out delivery over the registry.
///
/// Every operation is best-effort and fire-and-forget: a send submits the
/// message onto the target connection's outbound queue and returns. The
/// transport drains the queue on its own; nothing here waits for delivery
/// or reports it back to the caller. A recipient that is gone simply
/// misses the message.
pub struct PushService {
    registry: Registry,
    observer: Arc<dyn PushObserver>,
}

impl PushService {
    /// Create a push service with the default in-memory observer
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            observer: create_default_observer(),
        }
    }

    /// Create a push service reporting to a custom observer
    pub fn with_observer(registry: Registry, observer: Arc<dyn PushObserver>) -> Self {
        Self { registry, observer }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn observer(&self) -> &Arc<dyn PushObserver> {
        &self.observer
    }

    /// Submit a message to every open connection in the current snapshot.
    ///
    /// The snapshot is taken once, at call time; connections registered
    /// mid-broadcast are not targeted. A closed or failing target is
    /// skipped without affecting the rest.
    pub async fn broadcast(&self, message: &str) {
        let targets = self.registry.all_active().await;
        debug!("Broadcasting to {} connections", targets.len());

        let mut submitted = 0;
        for connection in targets {
            if !connection.is_open() {
                debug!(
                    "Skipping closed connection {} (user {})",
                    connection.id, connection.user_id
                );
                continue;
            }
            if connection.send_text(message) {
                submitted += 1;
                self.observer.message_submitted(&connection.user_id).await;
            } else {
                self.observer.submission_failed(&connection.user_id).await;
            }
        }

        info!("Broadcast message submitted to {} clients", submitted);
    }

    /// Submit a message to the connection currently registered for one
    /// user. Silent no-op when the user is absent or the connection is
    /// already closed.
    pub async fn send_to_user(&self, user_id: &str, message: &str) {
        match self.registry.lookup(user_id).await {
            Some(connection) if connection.is_open() => {
                if connection.send_text(message) {
                    debug!("Unicast message submitted to user {}", user_id);
                    self.observer.message_submitted(user_id).await;
                } else {
                    self.observer.submission_failed(user_id).await;
                }
            }
            Some(_) => {
                debug!("Dropping message for user {}: connection closed", user_id);
            }
            None => {
                debug!("Dropping message for user {}: not connected", user_id);
            }
        }
    }

    /// Repeat the unicast logic independently for each listed user.
    /// No internal dedup; an absent user does not affect the others.
    pub async fn send_to_users(&self, user_ids: &[String], message: &str) {
        for user_id in user_ids {
            self.send_to_user(user_id, message).await;
        }
    }

    /// Current number of tracked connections
    pub async fn active_count(&self) -> usize {
        self.registry.len().await
    }

    /// Whether a user currently has a registered connection
    pub async fn is_user_online(&self, user_id: &str) -> bool {
        self.registry.is_user_online(user_id).await
    }
}

// Shared reference to the push service
pub type SharedPushService = Arc<PushService>;
