//! Durable notification job queue.
//!
//! Jobs live in the `jobs` table and survive process restarts. Semantics
//! are at-least-once: a claim increments the attempt counter before the
//! handler runs, and stalled claims are eventually returned to the
//! waiting state for another worker.

use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use classhub_core::config::queue::QueueConfig;
use classhub_core::result::AppResult;
use classhub_database::repositories::job::JobRepository;
use classhub_entity::job::{CreateJob, DeliveryPayload, Job, JobStatus};

/// Point-in-time queue depth by status.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct QueueStats {
    pub waiting: i64,
    pub active: i64,
    pub completed: i64,
    pub failed: i64,
}

/// The durable delivery job queue.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    jobs: JobRepository,
    config: QueueConfig,
}

impl NotificationQueue {
    pub fn new(jobs: JobRepository, config: QueueConfig) -> Self {
        Self { jobs, config }
    }

    /// Enqueues a delivery job carrying the resolved recipient list.
    ///
    /// The job is visible to workers immediately.
    pub async fn enqueue_delivery(
        &self,
        recipient_ids: Vec<Uuid>,
        kind: &str,
        payload: serde_json::Value,
    ) -> AppResult<Job> {
        let delivery = DeliveryPayload {
            recipient_ids,
            kind: kind.to_string(),
            payload,
        };
        let job = self
            .jobs
            .create(&CreateJob {
                job_type: DeliveryPayload::JOB_TYPE.to_string(),
                payload: serde_json::to_value(&delivery)?,
                max_attempts: self.config.max_attempts,
                scheduled_at: None,
            })
            .await?;
        debug!(
            job_id = %job.id,
            recipients = delivery.recipient_ids.len(),
            kind = %delivery.kind,
            "Delivery job enqueued"
        );
        Ok(job)
    }

    /// Claims the next visible waiting job for this worker, if any.
    pub async fn claim(&self, worker_id: &str) -> AppResult<Option<Job>> {
        self.jobs.claim_next(worker_id).await
    }

    /// Acknowledges successful execution.
    pub async fn complete(&self, job_id: Uuid) -> AppResult<()> {
        self.jobs.mark_completed(job_id).await
    }

    /// Returns a failed attempt to the waiting state after a backoff delay.
    ///
    /// The delay doubles per attempt already made (2s, 4s, 8s, ...).
    pub async fn retry_with_backoff(&self, job: &Job, error: &str) -> AppResult<()> {
        let delay_ms = self.config.backoff_delay_ms(job.attempts);
        let scheduled_at = Utc::now() + Duration::milliseconds(delay_ms as i64);
        self.jobs.requeue(job.id, error, scheduled_at).await?;
        info!(
            job_id = %job.id,
            attempt = job.attempts,
            delay_ms,
            "Job scheduled for retry"
        );
        Ok(())
    }

    /// Marks a job permanently failed.
    pub async fn fail(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        self.jobs.mark_failed(job_id, error).await
    }

    /// Returns stalled active jobs to the waiting state.
    ///
    /// A job is stalled when its claim is older than the configured
    /// threshold, which covers workers that crashed mid-execution.
    pub async fn reclaim_stalled(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::seconds(self.config.stalled_threshold_seconds as i64);
        let reclaimed = self.jobs.reclaim_stalled(cutoff).await?;
        if reclaimed > 0 {
            info!(reclaimed, "Reclaimed stalled jobs");
        }
        Ok(reclaimed)
    }

    /// Retention pass: drops old completed jobs and caps the failed set.
    pub async fn run_retention(&self) -> AppResult<()> {
        let cutoff = Utc::now() - Duration::seconds(self.config.completed_ttl_seconds as i64);
        let completed = self.jobs.cleanup_completed(cutoff).await?;
        let failed = self.jobs.trim_failed(self.config.failed_keep).await?;
        if completed > 0 || failed > 0 {
            info!(
                completed_removed = completed,
                failed_removed = failed,
                "Queue retention pass finished"
            );
        }
        Ok(())
    }

    /// Current queue depth by status.
    pub async fn stats(&self) -> AppResult<QueueStats> {
        Ok(QueueStats {
            waiting: self.jobs.count_by_status(JobStatus::Waiting).await?,
            active: self.jobs.count_by_status(JobStatus::Active).await?,
            completed: self.jobs.count_by_status(JobStatus::Completed).await?,
            failed: self.jobs.count_by_status(JobStatus::Failed).await?,
        })
    }
}
