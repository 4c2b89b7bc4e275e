//! # classhub-worker
//!
//! The asynchronous half of the notification pipeline:
//!
//! - [`NotificationQueue`] — durable Postgres-backed job queue with
//!   at-least-once delivery, exponential retry backoff and retention
//! - [`WorkerRunner`] — bounded pool of concurrent job processors
//! - [`DeliveryJobHandler`] — chunks recipient lists and pushes over the
//!   live connection registry
//! - [`MaintenanceScheduler`] — cron jobs for retention and stalled-job
//!   recovery
//!
//! Delivery runs entirely off the request path; the only way in is
//! [`NotificationQueue::enqueue_delivery`].

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use jobs::deliver::DeliveryJobHandler;
pub use queue::NotificationQueue;
pub use runner::WorkerRunner;
pub use scheduler::MaintenanceScheduler;
