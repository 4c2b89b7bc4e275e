//! Delivery worker pool.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Semaphore};
use tracing::{error, info, warn};
use uuid::Uuid;

use classhub_core::config::worker::WorkerConfig;
use classhub_entity::job::Job;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::queue::NotificationQueue;

/// Polls the queue and processes jobs on a bounded pool of tasks.
///
/// Concurrency is capped by a semaphore; each claimed job occupies one
/// permit until its outcome is acknowledged. Handler errors never reach
/// the poll loop: they are converted into a retry or a permanent failure
/// on the job row itself.
pub struct WorkerRunner {
    queue: NotificationQueue,
    executor: Arc<JobExecutor>,
    config: WorkerConfig,
    worker_id: String,
}

impl WorkerRunner {
    pub fn new(queue: NotificationQueue, executor: Arc<JobExecutor>, config: WorkerConfig) -> Self {
        Self {
            queue,
            executor,
            config,
            worker_id: format!("worker-{}", Uuid::new_v4()),
        }
    }

    /// Runs the poll loop until shutdown is signalled.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut poll = tokio::time::interval(Duration::from_secs(self.config.poll_interval_seconds));
        poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(
            worker_id = %self.worker_id,
            concurrency = self.config.concurrency,
            "Delivery worker started"
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
                _ = poll.tick() => {
                    self.drain_available(&semaphore).await;
                }
            }
        }

        // Wait for in-flight jobs by reacquiring every permit.
        let _ = semaphore.acquire_many(self.config.concurrency as u32).await;
        info!(worker_id = %self.worker_id, "Delivery worker stopped");
    }

    /// Claims and dispatches jobs until the queue is empty or all permits
    /// are taken.
    async fn drain_available(&self, semaphore: &Arc<Semaphore>) {
        loop {
            let Ok(permit) = Arc::clone(semaphore).try_acquire_owned() else {
                return;
            };
            let job = match self.queue.claim(&self.worker_id).await {
                Ok(Some(job)) => job,
                Ok(None) => return,
                Err(e) => {
                    error!(error = %e, "Failed to claim job");
                    return;
                }
            };

            let queue = self.queue.clone();
            let executor = Arc::clone(&self.executor);
            tokio::spawn(async move {
                let _permit = permit;
                process_job(&queue, &executor, job).await;
            });
        }
    }
}

/// Executes one claimed job and records its outcome on the queue.
async fn process_job(queue: &NotificationQueue, executor: &JobExecutor, job: Job) {
    match executor.execute(&job).await {
        Ok(()) => {
            if let Err(e) = queue.complete(job.id).await {
                error!(job_id = %job.id, error = %e, "Failed to acknowledge completed job");
            }
        }
        Err(JobExecutionError::Transient(reason)) if job.can_retry() => {
            warn!(
                job_id = %job.id,
                attempt = job.attempts,
                max_attempts = job.max_attempts,
                reason = %reason,
                "Job failed, will retry"
            );
            if let Err(e) = queue.retry_with_backoff(&job, &reason).await {
                error!(job_id = %job.id, error = %e, "Failed to requeue job");
            }
        }
        Err(err) => {
            let reason = err.to_string();
            error!(
                job_id = %job.id,
                attempt = job.attempts,
                reason = %reason,
                "Job failed permanently"
            );
            if let Err(e) = queue.fail(job.id, &reason).await {
                error!(job_id = %job.id, error = %e, "Failed to mark job as failed");
            }
        }
    }
}
