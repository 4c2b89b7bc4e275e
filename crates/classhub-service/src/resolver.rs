//! Recipient resolution.
//!
//! Turns a domain event into the set of users who should be notified.
//! Roster data is owned by the classroom subsystem and reached through the
//! [`RosterProvider`] capability, so this crate never queries classroom
//! tables directly.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use classhub_core::error::ErrorKind;
use classhub_core::result::AppResult;
use classhub_core::traits::roster::RosterProvider;
use classhub_entity::event::EventRecord;

/// Resolves the fan-out target set for an event.
#[derive(Clone)]
pub struct RecipientResolver {
    roster: Arc<dyn RosterProvider>,
}

impl RecipientResolver {
    pub fn new(roster: Arc<dyn RosterProvider>) -> Self {
        Self { roster }
    }

    /// Current student roster of a classroom, deduplicated.
    ///
    /// A classroom that no longer exists resolves to an empty set: a
    /// dangling event must not fail the delivery pipeline.
    pub async fn resolve_for_classroom(&self, classroom_id: Uuid) -> AppResult<Vec<Uuid>> {
        match self.roster.roster(classroom_id).await {
            Ok(ids) => Ok(dedup(ids)),
            Err(e) if e.kind == ErrorKind::NotFound => {
                debug!(classroom_id = %classroom_id, "Classroom gone, resolving to empty roster");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Recipient set for a domain event.
    ///
    /// Targeted kinds (mention, grade, doubt answer) resolve to the single
    /// target user. Classroom-wide kinds resolve to the roster as it stands
    /// at resolution time, not at event creation. Everything else resolves
    /// to no one.
    pub async fn resolve_for_event(&self, event: &EventRecord) -> AppResult<Vec<Uuid>> {
        if event.kind.is_targeted() {
            return Ok(event.target_user_id.into_iter().collect());
        }
        if event.kind.is_classroom_wide() {
            return match event.classroom_id {
                Some(classroom_id) => self.resolve_for_classroom(classroom_id).await,
                None => Ok(Vec::new()),
            };
        }
        Ok(Vec::new())
    }
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use classhub_core::error::AppError;
    use classhub_entity::event::EventKind;

    struct StubRoster {
        members: Vec<Uuid>,
        missing: bool,
    }

    #[async_trait]
    impl RosterProvider for StubRoster {
        async fn roster(&self, _classroom_id: Uuid) -> AppResult<Vec<Uuid>> {
            if self.missing {
                return Err(AppError::not_found("Classroom not found"));
            }
            Ok(self.members.clone())
        }
    }

    fn resolver(members: Vec<Uuid>, missing: bool) -> RecipientResolver {
        RecipientResolver::new(Arc::new(StubRoster { members, missing }))
    }

    fn event(kind: EventKind, classroom_id: Option<Uuid>, target: Option<Uuid>) -> EventRecord {
        EventRecord {
            id: Uuid::new_v4(),
            kind,
            actor_id: Uuid::new_v4(),
            target_user_id: target,
            classroom_id,
            assignment_id: None,
            announcement_id: None,
            metadata: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_classroom_wide_event_resolves_to_full_roster() {
        let roster = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let resolver = resolver(roster.clone(), false);
        let evt = event(EventKind::AssignmentCreated, Some(Uuid::new_v4()), None);

        let recipients = resolver.resolve_for_event(&evt).await.expect("resolve");
        assert_eq!(recipients, roster);
    }

    #[tokio::test]
    async fn test_mention_resolves_to_target_only() {
        let roster = vec![Uuid::new_v4(), Uuid::new_v4()];
        let target = Uuid::new_v4();
        let resolver = resolver(roster, false);
        let evt = event(EventKind::Mention, Some(Uuid::new_v4()), Some(target));

        let recipients = resolver.resolve_for_event(&evt).await.expect("resolve");
        assert_eq!(recipients, vec![target]);
    }

    #[tokio::test]
    async fn test_missing_classroom_resolves_to_empty_set() {
        let resolver = resolver(vec![], true);
        let evt = event(EventKind::AnnouncementPosted, Some(Uuid::new_v4()), None);

        let recipients = resolver.resolve_for_event(&evt).await.expect("resolve");
        assert!(recipients.is_empty());
    }

    #[tokio::test]
    async fn test_non_notifying_kind_resolves_to_no_one() {
        let resolver = resolver(vec![Uuid::new_v4()], false);
        let evt = event(EventKind::StudentJoined, Some(Uuid::new_v4()), None);

        let recipients = resolver.resolve_for_event(&evt).await.expect("resolve");
        assert!(recipients.is_empty());
    }

    #[tokio::test]
    async fn test_roster_duplicates_are_removed() {
        let member = Uuid::new_v4();
        let other = Uuid::new_v4();
        let resolver = resolver(vec![member, other, member], false);

        let recipients = resolver
            .resolve_for_classroom(Uuid::new_v4())
            .await
            .expect("resolve");
        assert_eq!(recipients, vec![member, other]);
    }

    #[tokio::test]
    async fn test_classroom_wide_event_without_classroom_resolves_to_no_one() {
        let resolver = resolver(vec![Uuid::new_v4()], false);
        let evt = event(EventKind::AssignmentCreated, None, None);

        let recipients = resolver.resolve_for_event(&evt).await.expect("resolve");
        assert!(recipients.is_empty());
    }
}
