//! Roster capability — classroom membership lookups.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// Resolves the current student roster of a classroom.
///
/// The notification core depends only on this capability; the classroom
/// subsystem (out of scope here) implements it. Inverting the dependency
/// this way keeps the event/notification crates free of any module cycle
/// with classroom CRUD.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// Returns the user IDs of all students currently enrolled in the
    /// classroom, excluding the teacher.
    ///
    /// A classroom that no longer exists yields an **empty roster**, not an
    /// error — a dangling event must not block the delivery pipeline.
    async fn roster(&self, classroom_id: Uuid) -> AppResult<Vec<Uuid>>;
}
