//! Job repository implementation.
//!
//! The `jobs` table is the queue's backing store and the single source of
//! truth for job state. Claims are serialized with `FOR UPDATE SKIP
//! LOCKED` so no two workers ever own the same job.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use classhub_core::error::{AppError, ErrorKind};
use classhub_core::result::AppResult;
use classhub_entity::job::{CreateJob, Job, JobStatus};

/// Repository for delivery job queue operations.
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    /// Create a new job repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a job by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find job", e))
    }

    /// Create a new waiting job.
    pub async fn create(&self, data: &CreateJob) -> AppResult<Job> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (job_type, payload, max_attempts, scheduled_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.job_type)
        .bind(&data.payload)
        .bind(data.max_attempts)
        .bind(data.scheduled_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create job", e))
    }

    /// Claim the next visible waiting job (SKIP LOCKED for concurrency).
    ///
    /// The claim transitions the row waiting → active and increments the
    /// attempt counter in the same statement, so the attempt is counted
    /// even if the worker crashes mid-execution.
    pub async fn claim_next(&self, worker_id: &str) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'active', started_at = NOW(), worker_id = $1, \
             attempts = attempts + 1, updated_at = NOW() \
             WHERE id = ( \
                SELECT id FROM jobs \
                WHERE status = 'waiting' \
                AND (scheduled_at IS NULL OR scheduled_at <= NOW()) \
                ORDER BY created_at ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT 1 \
             ) RETURNING *",
        )
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim job", e))
    }

    /// Mark a job as completed.
    pub async fn mark_completed(&self, job_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'completed', completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete job", e))?;
        Ok(())
    }

    /// Mark a job as permanently failed.
    pub async fn mark_failed(&self, job_id: Uuid, error_message: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'failed', error_message = $2, worker_id = NULL, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(job_id)
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark job as failed", e)
        })?;
        Ok(())
    }

    /// Return a failed attempt to the waiting state with a backoff delay.
    pub async fn requeue(
        &self,
        job_id: Uuid,
        error_message: &str,
        scheduled_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'waiting', error_message = $2, scheduled_at = $3, \
             started_at = NULL, worker_id = NULL, updated_at = NOW() \
             WHERE id = $1 AND status = 'active'",
        )
        .bind(job_id)
        .bind(error_message)
        .bind(scheduled_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to requeue job", e))?;
        Ok(())
    }

    /// Reclaim active jobs whose claim is older than `cutoff`.
    ///
    /// Covers workers that crashed or hung before acknowledging: the job
    /// becomes visible to other workers again (at-least-once execution).
    pub async fn reclaim_stalled(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE jobs SET status = 'waiting', started_at = NULL, worker_id = NULL, \
             updated_at = NOW() \
             WHERE status = 'active' AND started_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to reclaim stalled jobs", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Delete completed jobs older than `cutoff`.
    pub async fn cleanup_completed(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM jobs WHERE status = 'completed' AND completed_at < $1")
                .bind(cutoff)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to cleanup completed jobs", e)
                })?;
        Ok(result.rows_affected())
    }

    /// Keep only the most recent `keep` failed jobs, oldest evicted first.
    pub async fn trim_failed(&self, keep: i64) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM jobs WHERE status = 'failed' AND id NOT IN (\
                SELECT id FROM jobs WHERE status = 'failed' \
                ORDER BY updated_at DESC LIMIT $1\
             )",
        )
        .bind(keep)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to trim failed jobs", e))?;
        Ok(result.rows_affected())
    }

    /// Count jobs in a given status.
    pub async fn count_by_status(&self, status: JobStatus) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count jobs", e))
    }
}
