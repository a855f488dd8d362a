//! WebSocket connection state
//! One instance per live client session

use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;
use warp::ws::Message;

use log::warn;

/// A single live client session: a resolved user identity plus the
/// write half of its outbound queue.
///
/// The transport layer owns the receiving half of `sender` and drains it
/// into the socket; when that half is dropped the connection counts as
/// closed. The registry only ever queries that state, it never owns it.
pub struct Connection {
    /// Unique connection identity, distinct from the user id. Two
    /// connections registered under the same user id still have
    /// different ids.
    pub id: String,
    /// User identity resolved at handshake time, immutable afterwards.
    pub user_id: String,
    pub sender: mpsc::UnboundedSender<Message>,
    pub connected_at: Instant,
}

impl Connection {
    /// Create a new connection for a user with a fresh unique ID
    pub fn new(user_id: String, sender: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            sender,
            connected_at: Instant::now(),
        }
    }

    /// Whether the transport still holds the other end of the queue.
    /// May be momentarily stale; the true state lives in the transport.
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Submit a text message for asynchronous delivery on this connection.
    /// Non-blocking: enqueues and returns. Returns false if the transport
    /// has already closed the queue.
    pub fn send_text(&self, text: &str) -> bool {
        match self.sender.send(Message::text(text)) {
            Ok(_) => true,
            Err(_) => {
                warn!(
                    "Failed to submit message to user {} (connection {})",
                    self.user_id, self.id
                );
                false
            }
        }
    }

    /// Calculate the connection duration
    pub fn connection_duration(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_ids_are_unique() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let a = Connection::new("u1".to_string(), tx.clone());
        let b = Connection::new("u1".to_string(), tx);
        assert_eq!(a.user_id, b.user_id);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_open_follows_transport() {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Connection::new("u1".to_string(), tx);
        assert!(conn.is_open());
        assert!(conn.send_text("hello"));

        drop(rx);
        assert!(!conn.is_open());
        assert!(!conn.send_text("dropped"));
    }
}
