//! Notification repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use classhub_core::error::{AppError, ErrorKind};
use classhub_core::result::AppResult;
use classhub_entity::notification::Notification;

/// Repository for durable per-recipient notifications.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bulk-insert one notification per recipient.
    ///
    /// A single multi-row statement, so the insert is all-or-nothing: a
    /// failure inserts zero rows and the whole fan-out step is retried
    /// upstream. Callers must not pass an empty slice.
    pub async fn create_for_users(
        &self,
        kind: &str,
        payload: &serde_json::Value,
        recipient_ids: &[Uuid],
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (recipient_id, kind, payload) \
             SELECT recipient_id, $2, $3 FROM UNNEST($1::uuid[]) AS t(recipient_id) \
             RETURNING *",
        )
        .bind(recipient_ids)
        .bind(kind)
        .bind(payload)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notifications", e)
        })
    }

    /// List notifications for a recipient, newest-first.
    pub async fn find_by_recipient(
        &self,
        recipient_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE recipient_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(recipient_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
        })
    }

    /// Count unread notifications for a recipient.
    pub async fn count_unread(&self, recipient_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    /// Mark a notification as read, scoped to its owner.
    ///
    /// The update is guarded on `is_read = FALSE`, so repeated calls and
    /// calls with a mismatched recipient affect zero rows rather than
    /// erroring or re-stamping `read_at`.
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        recipient_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = $3 \
             WHERE id = $1 AND recipient_id = $2 AND is_read = FALSE",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .bind(read_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected())
    }

    /// Mark all unread notifications as read for a recipient.
    pub async fn mark_all_read(
        &self,
        recipient_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = $2 \
             WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .bind(read_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }
}
