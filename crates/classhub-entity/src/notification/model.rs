//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A durable per-recipient notification.
///
/// One row exists per (event, recipient) pair. `is_read` only ever
/// transitions false → true.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user. Never null.
    pub recipient_id: Uuid,
    /// Notification kind tag (matches the originating event kind).
    pub kind: String,
    /// Opaque structured payload rendered by the client.
    pub payload: serde_json::Value,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check whether the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}
