//! Append-only domain event log service.

use tracing::debug;
use uuid::Uuid;

use classhub_core::result::AppResult;
use classhub_core::types::pagination::PageRequest;
use classhub_database::repositories::event::{EventFilter, EventRepository};
use classhub_entity::event::{EventKind, EventRecord, NewEvent};

/// Service facade over the domain event log.
///
/// Appends are best-effort relative to the domain operation that produced
/// them: callers that have already committed their primary write log an
/// append failure and continue rather than rolling back.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: EventRepository,
}

impl EventLog {
    pub fn new(events: EventRepository) -> Self {
        Self { events }
    }

    /// Appends an event and returns the stored record.
    pub async fn append(&self, event: NewEvent) -> AppResult<EventRecord> {
        let record = self.events.append(&event).await?;
        debug!(
            event_id = %record.id,
            kind = %record.kind,
            actor_id = %record.actor_id,
            "Domain event appended"
        );
        Ok(record)
    }

    /// Events in a classroom, newest-first.
    pub async fn list_for_classroom(
        &self,
        classroom_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Vec<EventRecord>> {
        self.events
            .find_by_classroom(classroom_id, page.limit, page.offset)
            .await
    }

    /// Events a user caused or was targeted by, newest-first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Vec<EventRecord>> {
        self.events
            .find_by_user(user_id, page.limit, page.offset)
            .await
    }

    /// Events of one kind with optional filters, newest-first.
    pub async fn list_by_kind(
        &self,
        kind: EventKind,
        filter: EventFilter,
        limit: i64,
    ) -> AppResult<Vec<EventRecord>> {
        self.events.find_by_kind(kind, &filter, limit).await
    }
}
