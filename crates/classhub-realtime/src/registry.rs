//! Live connection registry.
//!
//! Every authenticated connection joins exactly one room derived from its
//! user id (`user:<uuid>`), so delivery code never needs to know how many
//! sockets a user has open. Broadcasting to an empty room is a silent
//! no-op; persistence is the notification store's job.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use classhub_core::config::realtime::RealtimeConfig;
use classhub_core::result::AppResult;

use crate::connection::{ConnectionHandle, ConnectionId, ConnectionPool};
use crate::message::PushMessage;

/// Deterministic room key for a user.
pub fn user_room(user_id: Uuid) -> String {
    format!("user:{user_id}")
}

/// Tracks live WebSocket connections and their room membership.
///
/// State is process-local. Nothing here survives a restart; clients
/// re-register on reconnect.
#[derive(Debug)]
pub struct LiveConnectionRegistry {
    pool: ConnectionPool,
    rooms: DashMap<String, Vec<ConnectionId>>,
    channel_buffer: usize,
}

impl LiveConnectionRegistry {
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            pool: ConnectionPool::new(config.max_connections_per_user),
            rooms: DashMap::new(),
            channel_buffer: config.channel_buffer_size,
        }
    }

    /// Registers a new connection for an authenticated user.
    ///
    /// The connection is added to the user's room immediately; the caller
    /// drains the returned receiver onto the socket.
    pub fn register(
        &self,
        user_id: Uuid,
    ) -> AppResult<(Arc<ConnectionHandle>, mpsc::Receiver<String>)> {
        let (tx, rx) = mpsc::channel(self.channel_buffer);
        let handle = Arc::new(ConnectionHandle::new(user_id, tx));
        self.pool.insert(Arc::clone(&handle))?;
        self.rooms
            .entry(user_room(user_id))
            .or_default()
            .push(handle.id);

        debug!(
            user_id = %user_id,
            connection_id = %handle.id,
            "WebSocket connection registered"
        );
        Ok((handle, rx))
    }

    /// Removes a connection and leaves its room.
    ///
    /// Unregistering an unknown connection is a no-op, so disconnect
    /// handling stays idempotent.
    pub fn unregister(&self, connection_id: ConnectionId) {
        let Some(handle) = self.pool.remove(connection_id) else {
            return;
        };
        handle.mark_dead();
        let room = user_room(handle.user_id);
        if let Some(mut ids) = self.rooms.get_mut(&room) {
            ids.retain(|id| *id != connection_id);
            if ids.is_empty() {
                drop(ids);
                self.rooms.remove_if(&room, |_, ids| ids.is_empty());
            }
        }

        debug!(
            user_id = %handle.user_id,
            connection_id = %connection_id,
            "WebSocket connection unregistered"
        );
    }

    /// Pushes a message to every open connection of a user.
    ///
    /// Best-effort: dead or backed-up connections are skipped with a
    /// warning, and an offline user is a silent no-op. Returns the number
    /// of connections the frame was queued on.
    pub fn broadcast_to_user(&self, user_id: Uuid, message: &PushMessage) -> AppResult<usize> {
        let frame = serde_json::to_string(message)?;
        let room = user_room(user_id);
        let ids: Vec<ConnectionId> = match self.rooms.get(&room) {
            Some(ids) => ids.clone(),
            None => return Ok(0),
        };

        let mut delivered = 0;
        for connection_id in ids {
            let sent = self
                .pool
                .get(connection_id)
                .is_some_and(|h| h.send(frame.clone()));
            if sent {
                delivered += 1;
            } else {
                warn!(
                    user_id = %user_id,
                    connection_id = %connection_id,
                    "Dropping push for dead connection"
                );
            }
        }
        Ok(delivered)
    }

    /// Whether the user has at least one open connection.
    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.pool.has_user(user_id)
    }

    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Closes every connection, for graceful shutdown.
    pub fn close_all(&self) {
        self.rooms.clear();
        for handle in self.pool.drain() {
            handle.mark_dead();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LiveConnectionRegistry {
        LiveConnectionRegistry::new(&RealtimeConfig {
            max_connections_per_user: 5,
            channel_buffer_size: 16,
        })
    }

    #[test]
    fn test_room_key_is_deterministic() {
        let user = Uuid::new_v4();
        assert_eq!(user_room(user), format!("user:{user}"));
        assert_eq!(user_room(user), user_room(user));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_connections_of_user() {
        let registry = registry();
        let user = Uuid::new_v4();
        let (_h1, mut rx1) = registry.register(user).expect("register");
        let (_h2, mut rx2) = registry.register(user).expect("register");

        let msg = PushMessage::new("announcement", serde_json::json!({"classroom_id": "c1"}));
        let delivered = registry.broadcast_to_user(user, &msg).expect("broadcast");
        assert_eq!(delivered, 2);

        for rx in [&mut rx1, &mut rx2] {
            let frame = rx.recv().await.expect("frame");
            let value: serde_json::Value = serde_json::from_str(&frame).expect("json");
            assert_eq!(value["type"], "announcement");
        }
    }

    #[tokio::test]
    async fn test_broadcast_to_offline_user_is_noop() {
        let registry = registry();
        let msg = PushMessage::new("mention", serde_json::json!({}));
        let delivered = registry
            .broadcast_to_user(Uuid::new_v4(), &msg)
            .expect("broadcast");
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_broadcast_does_not_cross_users() {
        let registry = registry();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let (_ha, mut rx_alice) = registry.register(alice).expect("register");
        let (_hb, mut rx_bob) = registry.register(bob).expect("register");

        let msg = PushMessage::new("mention", serde_json::json!({}));
        registry.broadcast_to_user(alice, &msg).expect("broadcast");

        assert!(rx_alice.recv().await.is_some());
        assert!(rx_bob.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_removes_connection_and_room() {
        let registry = registry();
        let user = Uuid::new_v4();
        let (handle, _rx) = registry.register(user).expect("register");

        registry.unregister(handle.id);
        assert!(!registry.is_online(user));
        assert_eq!(registry.connection_count(), 0);

        let msg = PushMessage::new("mention", serde_json::json!({}));
        assert_eq!(
            registry.broadcast_to_user(user, &msg).expect("broadcast"),
            0
        );
    }

    #[tokio::test]
    async fn test_unregister_unknown_connection_is_noop() {
        let registry = registry();
        registry.unregister(Uuid::new_v4());
    }

    #[tokio::test]
    async fn test_dead_connection_skipped_others_still_delivered() {
        let registry = registry();
        let user = Uuid::new_v4();
        let (h1, _rx1_dropped) = {
            let (h, rx) = registry.register(user).expect("register");
            drop(rx);
            (h, ())
        };
        h1.mark_dead();
        let (_h2, mut rx2) = registry.register(user).expect("register");

        let msg = PushMessage::new("mention", serde_json::json!({}));
        let delivered = registry.broadcast_to_user(user, &msg).expect("broadcast");
        assert_eq!(delivered, 1);
        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_close_all_clears_registry() {
        let registry = registry();
        let user = Uuid::new_v4();
        let (handle, _rx) = registry.register(user).expect("register");

        registry.close_all();
        assert_eq!(registry.connection_count(), 0);
        assert!(!registry.is_online(user));
        assert!(!handle.is_alive());
    }
}
