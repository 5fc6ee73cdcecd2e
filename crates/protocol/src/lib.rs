//! Wire types shared by the bootstrap client and the real-time channel.
//!
//! Everything here is plain serde data; no I/O.

pub mod bootstrap;
pub mod frame;
pub mod messages;

pub use {
    bootstrap::{InterlocutorData, InterlocutorRequest, InterlocutorResponse},
    frame::Frame,
    messages::{
        Action, AgentReplyMessage, BotReplyMessage, ControlTakenMessage, Fulfillment,
        InterlocutorReplyMessage, ReplyPayload, decode_payload,
    },
};

/// Action type carrying a plain text bot answer.
pub const SEND_TEXT_ACTION: &str = "send_text_action";

/// Event names pushed by the server on an interlocutor topic.
pub mod events {
    pub const BOT_REPLY: &str = "bot_reply";
    pub const AGENT_REPLY: &str = "agent_reply";
    pub const CONTROL_TAKEN: &str = "control_taken";
    pub const INTERLOCUTOR_REPLY: &str = "interlocutor_reply";

    /// Outbound event used by `send_reply`.
    pub const REPLY: &str = "reply";

    pub const JOIN: &str = "phx_join";
    pub const LEAVE: &str = "phx_leave";
    pub const CLOSE: &str = "phx_close";
    pub const ERROR: &str = "phx_error";
    pub const SERVER_REPLY: &str = "phx_reply";
    pub const HEARTBEAT: &str = "heartbeat";
}

/// Topic used for socket-level heartbeats.
pub const HEARTBEAT_TOPIC: &str = "phoenix";

/// Serializer version requested on connect.
pub const SOCKET_VSN: &str = "2.0.0";

/// Topic name for an interlocutor's channel.
pub fn interlocutor_topic(interlocutor_id: &str) -> String {
    format!("interlocutor:{interlocutor_id}")
}
