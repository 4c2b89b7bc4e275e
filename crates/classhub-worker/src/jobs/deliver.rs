//! Realtime delivery job handler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use classhub_entity::job::{DeliveryPayload, Job};
use classhub_realtime::{LiveConnectionRegistry, PushMessage};

use crate::executor::{JobExecutionError, JobHandler};

/// Pushes a notification to every recipient currently connected.
///
/// Recipients are walked in fixed-size chunks to bound burst load on the
/// registry. A single recipient's push failure is logged and skipped;
/// failing the whole job would re-push to recipients already reached.
/// Durable rows were written before the job was enqueued, so offline
/// recipients lose nothing.
pub struct DeliveryJobHandler {
    registry: Arc<LiveConnectionRegistry>,
    chunk_size: usize,
}

impl DeliveryJobHandler {
    pub fn new(registry: Arc<LiveConnectionRegistry>, chunk_size: usize) -> Self {
        Self {
            registry,
            chunk_size: chunk_size.max(1),
        }
    }
}

#[async_trait]
impl JobHandler for DeliveryJobHandler {
    fn job_type(&self) -> &'static str {
        DeliveryPayload::JOB_TYPE
    }

    async fn execute(&self, job: &Job) -> Result<(), JobExecutionError> {
        let delivery: DeliveryPayload = serde_json::from_value(job.payload.clone())
            .map_err(|e| JobExecutionError::Permanent(format!("Malformed job payload: {e}")))?;

        let message = PushMessage::new(delivery.kind.clone(), delivery.payload.clone());
        let mut pushed = 0usize;
        for chunk in delivery.recipient_ids.chunks(self.chunk_size) {
            for recipient_id in chunk {
                match self.registry.broadcast_to_user(*recipient_id, &message) {
                    Ok(delivered) => pushed += delivered,
                    Err(e) => {
                        warn!(
                            job_id = %job.id,
                            recipient_id = %recipient_id,
                            error = %e,
                            "Push to recipient failed, continuing"
                        );
                    }
                }
            }
            tokio::task::yield_now().await;
        }

        debug!(
            job_id = %job.id,
            recipients = delivery.recipient_ids.len(),
            connections_pushed = pushed,
            "Delivery job finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use classhub_core::config::realtime::RealtimeConfig;
    use classhub_entity::job::JobStatus;
    use uuid::Uuid;

    fn registry() -> Arc<LiveConnectionRegistry> {
        Arc::new(LiveConnectionRegistry::new(&RealtimeConfig {
            max_connections_per_user: 5,
            channel_buffer_size: 16,
        }))
    }

    fn delivery_job(recipient_ids: Vec<Uuid>) -> Job {
        let now = Utc::now();
        let payload = DeliveryPayload {
            recipient_ids,
            kind: "announcement_posted".to_string(),
            payload: serde_json::json!({"announcement_id": "a1"}),
        };
        Job {
            id: Uuid::new_v4(),
            job_type: DeliveryPayload::JOB_TYPE.to_string(),
            payload: serde_json::to_value(&payload).expect("serialize"),
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
    async fn test_only_connected_recipients_receive_push() {
        let registry = registry();
        let online = Uuid::new_v4();
        let offline = Uuid::new_v4();
        let (_handle, mut rx) = registry.register(online).expect("register");

        let handler = DeliveryJobHandler::new(Arc::clone(&registry), 200);
        handler
            .execute(&delivery_job(vec![online, offline]))
            .await
            .expect("execute");

        let frame = rx.recv().await.expect("frame");
        let value: serde_json::Value = serde_json::from_str(&frame).expect("json");
        assert_eq!(value["type"], "announcement_posted");
        assert_eq!(value["payload"]["announcement_id"], "a1");
    }

    #[tokio::test]
    async fn test_large_recipient_list_is_fully_walked_in_chunks() {
        let registry = registry();
        let mut recipients: Vec<Uuid> = (0..450).map(|_| Uuid::new_v4()).collect();
        let last = *recipients.last().expect("nonempty");
        let (_handle, mut rx) = registry.register(last).expect("register");

        // 450 recipients with chunk size 200 walk as 200/200/50; the final
        // chunk member must still be reached.
        let handler = DeliveryJobHandler::new(Arc::clone(&registry), 200);
        handler
            .execute(&delivery_job(std::mem::take(&mut recipients)))
            .await
            .expect("execute");

        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_dead_connection_does_not_abort_remaining_recipients() {
        let registry = registry();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let (h1, rx1) = registry.register(first).expect("register");
        drop(rx1);
        h1.mark_dead();
        let (_h2, mut rx2) = registry.register(second).expect("register");

        let handler = DeliveryJobHandler::new(Arc::clone(&registry), 200);
        handler
            .execute(&delivery_job(vec![first, second]))
            .await
            .expect("execute");

        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_permanent_failure() {
        let handler = DeliveryJobHandler::new(registry(), 200);
        let mut job = delivery_job(vec![]);
        job.payload = serde_json::json!({"not": "a delivery payload"});

        let err = handler.execute(&job).await.unwrap_err();
        assert!(matches!(err, JobExecutionError::Permanent(_)));
    }
}
