//! Concurrent connection pool.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use classhub_core::error::AppError;
use classhub_core::result::AppResult;

use super::handle::{ConnectionHandle, ConnectionId};

/// Indexes open connections by connection id and by user.
///
/// A user may hold several connections at once (multiple tabs or
/// devices), bounded by `max_connections_per_user`.
#[derive(Debug)]
pub struct ConnectionPool {
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    by_user: DashMap<Uuid, Vec<ConnectionId>>,
    max_per_user: usize,
}

impl ConnectionPool {
    pub fn new(max_per_user: usize) -> Self {
        Self {
            by_id: DashMap::new(),
            by_user: DashMap::new(),
            max_per_user,
        }
    }

    /// Adds a connection, enforcing the per-user cap.
    pub fn insert(&self, handle: Arc<ConnectionHandle>) -> AppResult<()> {
        let mut ids = self.by_user.entry(handle.user_id).or_default();
        if ids.len() >= self.max_per_user {
            return Err(AppError::validation(format!(
                "Connection limit reached ({} per user)",
                self.max_per_user
            )));
        }
        ids.push(handle.id);
        drop(ids);
        self.by_id.insert(handle.id, handle);
        Ok(())
    }

    /// Removes a connection, returning its handle if it was present.
    pub fn remove(&self, connection_id: ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(&connection_id)?;
        if let Some(mut ids) = self.by_user.get_mut(&handle.user_id) {
            ids.retain(|id| *id != connection_id);
            if ids.is_empty() {
                drop(ids);
                self.by_user
                    .remove_if(&handle.user_id, |_, ids| ids.is_empty());
            }
        }
        Some(handle)
    }

    pub fn get(&self, connection_id: ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id
            .get(&connection_id)
            .map(|h| Arc::clone(h.value()))
    }

    /// Snapshot of a user's open connections.
    pub fn connections_for_user(&self, user_id: Uuid) -> Vec<Arc<ConnectionHandle>> {
        let Some(ids) = self.by_user.get(&user_id) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| self.by_id.get(id).map(|h| Arc::clone(h.value())))
            .collect()
    }

    pub fn has_user(&self, user_id: Uuid) -> bool {
        self.by_user
            .get(&user_id)
            .is_some_and(|ids| !ids.is_empty())
    }

    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Drains every connection, for shutdown.
    pub fn drain(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_user.clear();
        let handles: Vec<_> = self
            .by_id
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        self.by_id.clear();
        handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn handle(user_id: Uuid) -> Arc<ConnectionHandle> {
        let (tx, rx) = mpsc::channel(4);
        std::mem::forget(rx);
        Arc::new(ConnectionHandle::new(user_id, tx))
    }

    #[test]
    fn test_insert_and_lookup_by_user() {
        let pool = ConnectionPool::new(5);
        let user = Uuid::new_v4();
        let h1 = handle(user);
        let h2 = handle(user);
        pool.insert(Arc::clone(&h1)).expect("insert");
        pool.insert(Arc::clone(&h2)).expect("insert");

        let conns = pool.connections_for_user(user);
        assert_eq!(conns.len(), 2);
        assert!(pool.has_user(user));
        assert_eq!(pool.connection_count(), 2);
        assert_eq!(pool.user_count(), 1);
    }

    #[test]
    fn test_per_user_cap_enforced() {
        let pool = ConnectionPool::new(1);
        let user = Uuid::new_v4();
        pool.insert(handle(user)).expect("first insert");
        assert!(pool.insert(handle(user)).is_err());
    }

    #[test]
    fn test_remove_clears_user_index() {
        let pool = ConnectionPool::new(5);
        let user = Uuid::new_v4();
        let h = handle(user);
        pool.insert(Arc::clone(&h)).expect("insert");

        let removed = pool.remove(h.id).expect("removed");
        assert_eq!(removed.id, h.id);
        assert!(!pool.has_user(user));
        assert_eq!(pool.connection_count(), 0);
        assert_eq!(pool.user_count(), 0);
    }

    #[test]
    fn test_remove_unknown_is_none() {
        let pool = ConnectionPool::new(5);
        assert!(pool.remove(Uuid::new_v4()).is_none());
    }
}
