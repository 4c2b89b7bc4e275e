//! Job handler registry and execution.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use classhub_entity::job::Job;

/// How a job execution failed.
///
/// Transient failures are retried until the attempt budget runs out;
/// permanent failures go straight to the failed state.
#[derive(Debug, Error)]
pub enum JobExecutionError {
    /// The failure may resolve on its own (storage hiccup, timeout).
    #[error("transient: {0}")]
    Transient(String),
    /// Retrying cannot help (malformed payload, unknown job type).
    #[error("permanent: {0}")]
    Permanent(String),
}

/// A handler for one job type.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// The job type tag this handler serves.
    fn job_type(&self) -> &'static str;

    /// Executes one claimed job.
    async fn execute(&self, job: &Job) -> Result<(), JobExecutionError>;
}

/// Dispatches claimed jobs to their registered handler.
pub struct JobExecutor {
    handlers: HashMap<&'static str, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler for its job type.
    pub fn register(mut self, handler: Arc<dyn JobHandler>) -> Self {
        self.handlers.insert(handler.job_type(), handler);
        self
    }

    /// Executes a job with the handler registered for its type.
    ///
    /// An unknown job type is a permanent failure: retrying cannot make a
    /// handler appear.
    pub async fn execute(&self, job: &Job) -> Result<(), JobExecutionError> {
        let handler = self.handlers.get(job.job_type.as_str()).ok_or_else(|| {
            JobExecutionError::Permanent(format!("No handler for job type '{}'", job.job_type))
        })?;
        debug!(job_id = %job.id, job_type = %job.job_type, "Executing job");
        handler.execute(job).await
    }
}

impl Default for JobExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use classhub_entity::job::JobStatus;
    use uuid::Uuid;

    struct NoopHandler;

    #[async_trait]
    impl JobHandler for NoopHandler {
        fn job_type(&self) -> &'static str {
            "noop"
        }

        async fn execute(&self, _job: &Job) -> Result<(), JobExecutionError> {
            Ok(())
        }
    }

    fn job(job_type: &str) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            job_type: job_type.to_string(),
            payload: serde_json::json!({}),
            status: JobStatus::Active,
            attempts: 1,
            max_attempts: 3,
            error_message: None,
            scheduled_at: None,
            started_at: Some(now),
            completed_at: None,
            worker_id: Some("worker-test".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_dispatches_to_registered_handler() {
        let executor = JobExecutor::new().register(Arc::new(NoopHandler));
        assert!(executor.execute(&job("noop")).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_job_type_is_permanent_failure() {
        let executor = JobExecutor::new();
        let err = executor.execute(&job("mystery")).await.unwrap_err();
        assert!(matches!(err, JobExecutionError::Permanent(_)));
    }
}
