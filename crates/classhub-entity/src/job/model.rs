//! Job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::JobStatus;

/// A durable delivery job.
///
/// Queue rows are the single source of truth for job state; a job is owned
/// by at most one worker at a time (serialized claim).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique job identifier.
    pub id: Uuid,
    /// Job type identifier (e.g., `"deliver_notification"`).
    pub job_type: String,
    /// Job-specific payload (JSON).
    pub payload: serde_json::Value,
    /// Current job status.
    pub status: JobStatus,
    /// Number of execution attempts made so far.
    pub attempts: i32,
    /// Maximum allowed attempts.
    pub max_attempts: i32,
    /// Error message from the most recent failure.
    pub error_message: Option<String>,
    /// Earliest time the job may be claimed (None = immediately).
    pub scheduled_at: Option<DateTime<Utc>>,
    /// When the current attempt started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Worker that currently owns the job.
    pub worker_id: Option<String>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the job was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Check whether another attempt is allowed after a failure.
    pub fn can_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }
}

/// Data required to create a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    /// Job type identifier.
    pub job_type: String,
    /// Job-specific payload.
    pub payload: serde_json::Value,
    /// Maximum execution attempts.
    pub max_attempts: i32,
    /// Earliest claim time (None = immediately visible).
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_with_attempts(attempts: i32, max_attempts: i32) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            job_type: "deliver_notification".to_string(),
            payload: serde_json::json!({}),
            status: JobStatus::Active,
            attempts,
            max_attempts,
            error_message: None,
            scheduled_at: None,
            started_at: Some(now),
            completed_at: None,
            worker_id: Some("worker-test".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_can_retry_below_max() {
        assert!(job_with_attempts(1, 3).can_retry());
        assert!(job_with_attempts(2, 3).can_retry());
    }

    #[test]
    fn test_cannot_retry_at_max() {
        assert!(!job_with_attempts(3, 3).can_retry());
    }
}
