//! Payloads of the four inbound event kinds and the outbound reply.

use {
    serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned},
    serde_json::Value,
};

use crate::SEND_TEXT_ACTION;

/// Answer produced by the bot engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotReplyMessage {
    #[serde(default)]
    pub fulfillment: Fulfillment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fulfillment {
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One step of a bot answer. Only text actions carry `text`; other kinds
/// (quick replies, cards, waits...) are kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Action {
    pub fn send_text(text: impl Into<String>) -> Self {
        Self {
            kind: SEND_TEXT_ACTION.into(),
            text: Some(text.into()),
        }
    }

    pub fn is_send_text(&self) -> bool {
        self.kind == SEND_TEXT_ACTION
    }
}

impl BotReplyMessage {
    /// Texts of the `send_text_action` steps, in action order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.fulfillment
            .actions
            .iter()
            .filter(|a| a.is_send_text())
            .map(|a| a.text.as_deref().unwrap_or_default())
    }
}

/// Message typed by a human agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentReplyMessage {
    #[serde(default)]
    pub message: String,
}

/// A human agent took (`true`) or released (`false`) the conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlTakenMessage {
    #[serde(default, deserialize_with = "taken_flag")]
    pub value: bool,
}

/// Only a literal `true` means taken; null or any other value is a release.
fn taken_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Decode an event payload. A `null` payload decodes like `{}`, so every
/// field falls back to its default.
pub fn decode_payload<T: DeserializeOwned>(payload: Value) -> serde_json::Result<T> {
    match payload {
        Value::Null => serde_json::from_value(Value::Object(Default::default())),
        payload => serde_json::from_value(payload),
    }
}

/// Text sent by the interlocutor, either by us or by another client sharing
/// the same interlocutor id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterlocutorReplyMessage {
    #[serde(rename = "type", default = "default_reply_kind")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

fn default_reply_kind() -> String {
    "text".into()
}

impl InterlocutorReplyMessage {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            kind: default_reply_kind(),
            message: message.into(),
        }
    }
}

/// Payload of the outbound `reply` push.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyPayload<'a> {
    pub token: &'a str,
    pub message: &'a InterlocutorReplyMessage,
}
