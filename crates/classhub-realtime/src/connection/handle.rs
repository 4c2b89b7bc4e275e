//! Per-connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Unique identifier for a single WebSocket connection.
pub type ConnectionId = Uuid;

/// Handle to one open WebSocket connection.
///
/// The handle owns the sending half of the outbound channel; the socket
/// task drains the receiving half and writes frames to the wire. Once the
/// channel is closed or full the connection is marked dead and skipped by
/// subsequent broadcasts until the socket task unregisters it.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Connection identifier, unique per socket.
    pub id: ConnectionId,
    /// Authenticated user this connection belongs to.
    pub user_id: Uuid,
    /// When the connection was registered.
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<String>,
    alive: AtomicBool,
}

impl ConnectionHandle {
    pub fn new(user_id: Uuid, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            connected_at: Utc::now(),
            sender,
            alive: AtomicBool::new(true),
        }
    }

    /// Queues a serialized frame for delivery.
    ///
    /// Returns `false` when the connection is dead or its outbound buffer
    /// is full. A full buffer marks the connection dead rather than
    /// blocking the broadcaster behind a slow client.
    pub fn send(&self, frame: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(_) => {
                self.mark_dead();
                false
            }
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_delivers_frame() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = ConnectionHandle::new(Uuid::new_v4(), tx);

        assert!(handle.send("hello".to_string()));
        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_full_buffer_marks_connection_dead() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(Uuid::new_v4(), tx);

        assert!(handle.send("a".to_string()));
        assert!(!handle.send("b".to_string()));
        assert!(!handle.is_alive());
        assert!(!handle.send("c".to_string()));
    }

    #[tokio::test]
    async fn test_closed_receiver_marks_connection_dead() {
        let (tx, rx) = mpsc::channel(4);
        let handle = ConnectionHandle::new(Uuid::new_v4(), tx);
        drop(rx);

        assert!(!handle.send("a".to_string()));
        assert!(!handle.is_alive());
    }
}
