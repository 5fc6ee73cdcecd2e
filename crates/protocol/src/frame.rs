//! Socket frames: JSON arrays `[join_ref, ref, topic, event, payload]`.

use {
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

use crate::events;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame(
    pub Option<String>,
    pub Option<String>,
    pub String,
    pub String,
    pub Value,
);

impl Frame {
    pub fn new(
        join_ref: Option<String>,
        msg_ref: Option<String>,
        topic: impl Into<String>,
        event: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self(join_ref, msg_ref, topic.into(), event.into(), payload)
    }

    pub fn join_ref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn msg_ref(&self) -> Option<&str> {
        self.1.as_deref()
    }

    pub fn topic(&self) -> &str {
        &self.2
    }

    pub fn event(&self) -> &str {
        &self.3
    }

    pub fn payload(&self) -> &Value {
        &self.4
    }

    pub fn into_payload(self) -> Value {
        self.4
    }

    pub fn is_reply(&self) -> bool {
        self.event() == events::SERVER_REPLY
    }

    /// `payload.status` of a server reply (`"ok"` / `"error"`).
    pub fn reply_status(&self) -> Option<&str> {
        self.payload().get("status").and_then(Value::as_str)
    }

    /// `payload.response` of a server reply.
    pub fn reply_response(&self) -> Option<&Value> {
        self.payload().get("response")
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn decode(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
