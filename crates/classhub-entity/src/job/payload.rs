//! Typed job payload for delivery jobs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload carried by a `deliver_notification` job.
///
/// The recipient list was resolved at enqueue time; the worker only pushes
/// to whoever is currently connected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryPayload {
    /// Users to push to.
    pub recipient_ids: Vec<Uuid>,
    /// Notification kind tag forwarded on the wire.
    pub kind: String,
    /// Opaque structured payload forwarded on the wire.
    pub payload: serde_json::Value,
}

impl DeliveryPayload {
    /// Job type tag for delivery jobs.
    pub const JOB_TYPE: &'static str = "deliver_notification";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_json_roundtrip() {
        let payload = DeliveryPayload {
            recipient_ids: vec![Uuid::new_v4(), Uuid::new_v4()],
            kind: "announcement_posted".to_string(),
            payload: serde_json::json!({"announcement_id": "a1"}),
        };
        let value = serde_json::to_value(&payload).expect("serialize");
        let parsed: DeliveryPayload = serde_json::from_value(value).expect("deserialize");
        assert_eq!(parsed.recipient_ids, payload.recipient_ids);
        assert_eq!(parsed.kind, "announcement_posted");
    }
}
