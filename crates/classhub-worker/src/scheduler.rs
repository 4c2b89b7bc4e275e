//! Periodic queue maintenance.
//!
//! Two cron jobs keep the queue healthy: a retention sweep (drops
//! completed jobs past their TTL and caps the failed set) and a stalled
//! claim reclaimer (returns abandoned active jobs to the waiting state).

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{error, info};

use classhub_core::error::{AppError, ErrorKind};
use classhub_core::result::AppResult;

use crate::queue::NotificationQueue;

/// Cron schedule for the retention sweep (every minute).
const RETENTION_SCHEDULE: &str = "0 * * * * *";
/// Cron schedule for stalled-job recovery (every 30 seconds).
const RECLAIM_SCHEDULE: &str = "*/30 * * * * *";

/// Owns the cron scheduler for queue maintenance.
pub struct MaintenanceScheduler {
    scheduler: JobScheduler,
}

impl MaintenanceScheduler {
    /// Builds the scheduler with both maintenance jobs registered.
    pub async fn new(queue: NotificationQueue) -> AppResult<Self> {
        let scheduler = JobScheduler::new().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to create scheduler", e)
        })?;

        let retention_queue = queue.clone();
        let retention = CronJob::new_async(RETENTION_SCHEDULE, move |_id, _lock| {
            let queue = retention_queue.clone();
            Box::pin(async move {
                if let Err(e) = queue.run_retention().await {
                    error!(error = %e, "Queue retention pass failed");
                }
            })
        })
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to create retention job", e)
        })?;

        let reclaim_queue = queue;
        let reclaim = CronJob::new_async(RECLAIM_SCHEDULE, move |_id, _lock| {
            let queue = reclaim_queue.clone();
            Box::pin(async move {
                if let Err(e) = queue.reclaim_stalled().await {
                    error!(error = %e, "Stalled job reclaim failed");
                }
            })
        })
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to create reclaim job", e)
        })?;

        scheduler.add(retention).await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to register retention job", e)
        })?;
        scheduler.add(reclaim).await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to register reclaim job", e)
        })?;

        Ok(Self { scheduler })
    }

    /// Starts the scheduler in the background.
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler.start().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to start scheduler", e)
        })?;
        info!("Queue maintenance scheduler started");
        Ok(())
    }

    /// Stops the scheduler, letting in-flight sweeps finish.
    pub async fn shutdown(&mut self) -> AppResult<()> {
        self.scheduler.shutdown().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to stop scheduler", e)
        })?;
        Ok(())
    }
}
