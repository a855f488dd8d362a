//! Delivery observability
//!
//! The delivery engine never reports outcomes through return values, so
//! this module is the seam where outcomes become visible: a pluggable
//! observer trait plus an in-memory implementation for the status API
//! and tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Counters accumulated by the in-memory observer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushStats {
    /// Messages accepted onto a connection's outbound queue
    pub messages_submitted: u64,
    /// Submissions that failed because the transport had closed the queue
    pub submission_failures: u64,
    /// Connections opened since start
    pub connections_opened: u64,
    /// Connections closed since start
    pub connections_closed: u64,
}

/// Observer for delivery and connection lifecycle events
#[async_trait]
pub trait PushObserver: Send + Sync {
    /// A message was accepted onto a connection's outbound queue
    async fn message_submitted(&self, user_id: &str);

    /// A submission failed because the target's queue was already closed
    async fn submission_failed(&self, user_id: &str);

    /// A connection was registered; `total` is the new registry size
    async fn connection_opened(&self, total: usize);

    /// A connection was unregistered; `total` is the new registry size
    async fn connection_closed(&self, total: usize);

    /// Current counter values
    async fn stats(&self) -> PushStats;
}

/// In-memory observer backing the status endpoint
#[derive(Default)]
pub struct InMemoryPushObserver {
    stats: RwLock<PushStats>,
}

impl InMemoryPushObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PushObserver for InMemoryPushObserver {
    async fn message_submitted(&self, _user_id: &str) {
        let mut stats = self.stats.write().await;
        stats.messages_submitted += 1;
    }

    async fn submission_failed(&self, _user_id: &str) {
        let mut stats = self.stats.write().await;
        stats.submission_failures += 1;
    }

    async fn connection_opened(&self, _total: usize) {
        let mut stats = self.stats.write().await;
        stats.connections_opened += 1;
    }

    async fn connection_closed(&self, _total: usize) {
        let mut stats = self.stats.write().await;
        stats.connections_closed += 1;
    }

    async fn stats(&self) -> PushStats {
        self.stats.read().await.clone()
    }
}

/// Create the default in-memory observer
pub fn create_default_observer() -> Arc<dyn PushObserver> {
    Arc::new(InMemoryPushObserver::new())
}
