//! Durable notification store.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use classhub_core::result::AppResult;
use classhub_core::types::pagination::PageRequest;
use classhub_database::repositories::notification::NotificationRepository;
use classhub_entity::notification::Notification;

use crate::resolver::RecipientResolver;

/// Service facade over per-recipient notification rows.
///
/// Rows are the durable leg of the pipeline: whatever the realtime push
/// does or fails to do, every recipient sees the notification on their
/// next list call.
#[derive(Clone)]
pub struct NotificationStore {
    notifications: NotificationRepository,
    resolver: RecipientResolver,
}

impl NotificationStore {
    pub fn new(notifications: NotificationRepository, resolver: RecipientResolver) -> Self {
        Self {
            notifications,
            resolver,
        }
    }

    /// Creates one notification row per recipient.
    ///
    /// An empty recipient list is a no-op that touches no storage. The
    /// insert itself is all-or-nothing; a failure leaves zero rows and
    /// propagates so the caller can retry the whole fan-out step.
    pub async fn create_for_users(
        &self,
        kind: &str,
        payload: &serde_json::Value,
        recipient_ids: &[Uuid],
    ) -> AppResult<Vec<Notification>> {
        if recipient_ids.is_empty() {
            return Ok(Vec::new());
        }
        let created = self
            .notifications
            .create_for_users(kind, payload, recipient_ids)
            .await?;
        debug!(
            kind = %kind,
            count = created.len(),
            "Notifications created"
        );
        Ok(created)
    }

    /// Resolves a classroom roster and creates one row per member.
    pub async fn create_for_classroom(
        &self,
        kind: &str,
        payload: &serde_json::Value,
        classroom_id: Uuid,
    ) -> AppResult<Vec<Notification>> {
        let recipients = self.resolver.resolve_for_classroom(classroom_id).await?;
        self.create_for_users(kind, payload, &recipients).await
    }

    /// A user's notifications, newest-first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Vec<Notification>> {
        self.notifications
            .find_by_recipient(user_id, page.limit, page.offset)
            .await
    }

    /// Number of unread notifications for a user.
    pub async fn unread_count(&self, user_id: Uuid) -> AppResult<i64> {
        self.notifications.count_unread(user_id).await
    }

    /// Marks one notification read, scoped to its owner.
    ///
    /// Returns whether a row was flipped. Already-read rows and rows owned
    /// by someone else affect nothing, so the call is safely repeatable.
    pub async fn mark_read(&self, notification_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let affected = self
            .notifications
            .mark_read(notification_id, user_id, Utc::now())
            .await?;
        Ok(affected > 0)
    }

    /// Marks every unread notification read for a user.
    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        self.notifications.mark_all_read(user_id, Utc::now()).await
    }
}
