//! Closed enumeration of domain event kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Everything that can happen in a classroom that downstream consumers
/// care about. The set is closed: appending an event with a kind outside
/// this enum is rejected at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A classroom was created.
    ClassroomCreated,
    /// A student joined a classroom.
    StudentJoined,
    /// A student left a classroom.
    StudentLeft,
    /// A student was removed by the teacher.
    StudentRemoved,
    /// An assignment was posted.
    AssignmentCreated,
    /// An assignment was edited.
    AssignmentUpdated,
    /// A student submitted work for an assignment.
    AssignmentSubmitted,
    /// A submission was graded.
    AssignmentGraded,
    /// An announcement was posted.
    AnnouncementPosted,
    /// An announcement was edited.
    AnnouncementUpdated,
    /// A user was mentioned.
    Mention,
    /// A student asked a doubt.
    NewDoubt,
    /// A doubt was answered.
    DoubtAnswered,
}

impl EventKind {
    /// Whether this kind fans out to the whole classroom roster
    /// (as opposed to a single targeted user).
    pub fn is_classroom_wide(&self) -> bool {
        matches!(
            self,
            Self::AssignmentCreated
                | Self::AssignmentUpdated
                | Self::AnnouncementPosted
                | Self::AnnouncementUpdated
        )
    }

    /// Whether this kind targets exactly one user.
    pub fn is_targeted(&self) -> bool {
        matches!(
            self,
            Self::Mention | Self::AssignmentGraded | Self::DoubtAnswered
        )
    }

    /// Return the kind as its snake_case wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClassroomCreated => "classroom_created",
            Self::StudentJoined => "student_joined",
            Self::StudentLeft => "student_left",
            Self::StudentRemoved => "student_removed",
            Self::AssignmentCreated => "assignment_created",
            Self::AssignmentUpdated => "assignment_updated",
            Self::AssignmentSubmitted => "assignment_submitted",
            Self::AssignmentGraded => "assignment_graded",
            Self::AnnouncementPosted => "announcement_posted",
            Self::AnnouncementUpdated => "announcement_updated",
            Self::Mention => "mention",
            Self::NewDoubt => "new_doubt",
            Self::DoubtAnswered => "doubt_answered",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classroom_created" => Ok(Self::ClassroomCreated),
            "student_joined" => Ok(Self::StudentJoined),
            "student_left" => Ok(Self::StudentLeft),
            "student_removed" => Ok(Self::StudentRemoved),
            "assignment_created" => Ok(Self::AssignmentCreated),
            "assignment_updated" => Ok(Self::AssignmentUpdated),
            "assignment_submitted" => Ok(Self::AssignmentSubmitted),
            "assignment_graded" => Ok(Self::AssignmentGraded),
            "announcement_posted" => Ok(Self::AnnouncementPosted),
            "announcement_updated" => Ok(Self::AnnouncementUpdated),
            "mention" => Ok(Self::Mention),
            "new_doubt" => Ok(Self::NewDoubt),
            "doubt_answered" => Ok(Self::DoubtAnswered),
            other => Err(format!("unknown event kind: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tag_roundtrip() {
        let kind = EventKind::AnnouncementPosted;
        let parsed: EventKind = kind.as_str().parse().expect("should parse");
        assert_eq!(parsed, kind);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert!("homework_eaten".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_mention_is_targeted_not_classroom_wide() {
        assert!(EventKind::Mention.is_targeted());
        assert!(!EventKind::Mention.is_classroom_wide());
    }

    #[test]
    fn test_announcement_is_classroom_wide() {
        assert!(EventKind::AnnouncementPosted.is_classroom_wide());
        assert!(!EventKind::AnnouncementPosted.is_targeted());
    }
}
