//! Domain event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::EventKind;

/// An immutable record of something that happened.
///
/// Rows are append-only: never updated, never deleted. Reads are ordered
/// newest-first by `created_at`, ties broken by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRecord {
    /// Unique event identifier.
    pub id: Uuid,
    /// What happened.
    pub kind: EventKind,
    /// The user who caused the event.
    pub actor_id: Uuid,
    /// Targeted user, for mention/grade/answer events.
    pub target_user_id: Option<Uuid>,
    /// Classroom the event happened in.
    pub classroom_id: Option<Uuid>,
    /// Assignment involved, if any.
    pub assignment_id: Option<Uuid>,
    /// Announcement involved, if any.
    pub announcement_id: Option<Uuid>,
    /// Opaque structured payload.
    pub metadata: Option<serde_json::Value>,
    /// When the event occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    /// What happened.
    pub kind: EventKind,
    /// The user who caused the event.
    pub actor_id: Uuid,
    /// Targeted user, for targeted kinds.
    pub target_user_id: Option<Uuid>,
    /// Classroom the event happened in.
    pub classroom_id: Option<Uuid>,
    /// Assignment involved, if any.
    pub assignment_id: Option<Uuid>,
    /// Announcement involved, if any.
    pub announcement_id: Option<Uuid>,
    /// Opaque structured payload.
    pub metadata: Option<serde_json::Value>,
}

impl NewEvent {
    /// Shorthand for an event with only a kind and actor.
    pub fn new(kind: EventKind, actor_id: Uuid) -> Self {
        Self {
            kind,
            actor_id,
            target_user_id: None,
            classroom_id: None,
            assignment_id: None,
            announcement_id: None,
            metadata: None,
        }
    }

    /// Attach a classroom.
    pub fn in_classroom(mut self, classroom_id: Uuid) -> Self {
        self.classroom_id = Some(classroom_id);
        self
    }

    /// Attach a target user.
    pub fn targeting(mut self, user_id: Uuid) -> Self {
        self.target_user_id = Some(user_id);
        self
    }

    /// Attach an assignment.
    pub fn for_assignment(mut self, assignment_id: Uuid) -> Self {
        self.assignment_id = Some(assignment_id);
        self
    }

    /// Attach an announcement.
    pub fn for_announcement(mut self, announcement_id: Uuid) -> Self {
        self.announcement_id = Some(announcement_id);
        self
    }

    /// Attach opaque metadata.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_fields() {
        let classroom = Uuid::new_v4();
        let actor = Uuid::new_v4();
        let event = NewEvent::new(EventKind::AnnouncementPosted, actor)
            .in_classroom(classroom)
            .for_announcement(Uuid::new_v4())
            .with_metadata(serde_json::json!({"title": "Exam moved"}));

        assert_eq!(event.kind, EventKind::AnnouncementPosted);
        assert_eq!(event.actor_id, actor);
        assert_eq!(event.classroom_id, Some(classroom));
        assert!(event.announcement_id.is_some());
        assert!(event.target_user_id.is_none());
    }
}
