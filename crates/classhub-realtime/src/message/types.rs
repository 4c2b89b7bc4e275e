//! Push message definition.
//!
//! The notifications channel is receive-only for clients: after the
//! authenticated handshake the server only ever emits `PushMessage`
//! frames, and no client-to-server message types are defined.

use serde::{Deserialize, Serialize};

/// A realtime push delivered to a user's room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    /// Notification kind tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque structured payload.
    pub payload: serde_json::Value,
}

impl PushMessage {
    /// Create a new push message.
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_uses_type_field() {
        let msg = PushMessage::new("mention", serde_json::json!({"announcement_id": "a2"}));
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["type"], "mention");
        assert_eq!(json["payload"]["announcement_id"], "a2");
    }
}
