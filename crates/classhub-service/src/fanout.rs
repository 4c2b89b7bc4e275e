//! Fan-out orchestration.
//!
//! The only code path that turns a domain event into notifications:
//! resolve the recipient set, write the durable rows, then enqueue one
//! delivery job for the realtime push. Durable rows come first so an
//! enqueue failure can never lose a notification, only delay its push.

use tracing::{debug, info};

use classhub_core::result::AppResult;
use classhub_entity::event::EventRecord;
use classhub_entity::notification::Notification;
use classhub_worker::NotificationQueue;

use crate::resolver::RecipientResolver;
use crate::store::NotificationStore;

/// Outcome of one fan-out attempt.
#[derive(Debug)]
pub struct FanoutOutcome {
    /// Durable rows created, one per recipient.
    pub notifications: Vec<Notification>,
    /// Delivery job id, absent when there was no one to notify.
    pub job_id: Option<uuid::Uuid>,
}

/// Expands domain events into per-recipient notifications and delivery
/// jobs.
#[derive(Clone)]
pub struct FanoutService {
    resolver: RecipientResolver,
    store: NotificationStore,
    queue: NotificationQueue,
}

impl FanoutService {
    pub fn new(
        resolver: RecipientResolver,
        store: NotificationStore,
        queue: NotificationQueue,
    ) -> Self {
        Self {
            resolver,
            store,
            queue,
        }
    }

    /// Fans an event out to its recipients.
    ///
    /// Zero recipients (non-notifying kind, empty or vanished roster) is a
    /// quiet no-op. Store and enqueue failures propagate; callers on the
    /// request path log and continue rather than rolling back the domain
    /// operation that produced the event.
    pub async fn fan_out(&self, event: &EventRecord) -> AppResult<FanoutOutcome> {
        let recipients = self.resolver.resolve_for_event(event).await?;
        if recipients.is_empty() {
            debug!(event_id = %event.id, kind = %event.kind, "No recipients, skipping fan-out");
            return Ok(FanoutOutcome {
                notifications: Vec::new(),
                job_id: None,
            });
        }

        let kind = event.kind.as_str();
        let payload = wire_payload(event);
        let notifications = self
            .store
            .create_for_users(kind, &payload, &recipients)
            .await?;
        let job = self
            .queue
            .enqueue_delivery(recipients, kind, payload)
            .await?;

        info!(
            event_id = %event.id,
            kind = %event.kind,
            recipients = notifications.len(),
            job_id = %job.id,
            "Event fanned out"
        );
        Ok(FanoutOutcome {
            notifications,
            job_id: Some(job.id),
        })
    }
}

/// Payload pushed to clients and stored on each notification row.
fn wire_payload(event: &EventRecord) -> serde_json::Value {
    serde_json::json!({
        "event_id": event.id,
        "actor_id": event.actor_id,
        "classroom_id": event.classroom_id,
        "assignment_id": event.assignment_id,
        "announcement_id": event.announcement_id,
        "metadata": event.metadata,
        "created_at": event.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use classhub_entity::event::EventKind;
    use uuid::Uuid;

    #[test]
    fn test_wire_payload_carries_event_references() {
        let classroom = Uuid::new_v4();
        let event = EventRecord {
            id: Uuid::new_v4(),
            kind: EventKind::AnnouncementPosted,
            actor_id: Uuid::new_v4(),
            target_user_id: None,
            classroom_id: Some(classroom),
            assignment_id: None,
            announcement_id: Some(Uuid::new_v4()),
            metadata: Some(serde_json::json!({"title": "Exam moved"})),
            created_at: Utc::now(),
        };

        let payload = wire_payload(&event);
        assert_eq!(payload["event_id"], serde_json::json!(event.id));
        assert_eq!(payload["classroom_id"], serde_json::json!(classroom));
        assert_eq!(payload["metadata"]["title"], "Exam moved");
    }
}
