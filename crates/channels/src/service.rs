use std::sync::Arc;

use {
    async_trait::async_trait,
    futures::stream::BoxStream,
    relaychat_protocol::{
        AgentReplyMessage, BotReplyMessage, ControlTakenMessage, InterlocutorReplyMessage,
    },
    secrecy::Secret,
};

use crate::{error::ChannelError, state::ConnectionState};

/// Stream of server pushes. Ends only when the producer goes away.
pub type EventStream<T> = BoxStream<'static, T>;

/// Entry point of a webchat backend: one real-time socket shared by every
/// interlocutor channel built from it.
#[async_trait]
pub trait WebChatService: Send + Sync {
    /// Open the socket. Calling it again while connected is a no-op.
    async fn connect(&self) -> Result<(), ChannelError>;

    /// Current connection state followed by every change.
    fn connection_state(&self) -> EventStream<ConnectionState>;

    /// Build a fresh channel handle. Nothing is sent until `join`.
    fn interlocutor_channel(&self, params: ChannelParams) -> Arc<dyn InterlocutorChannel>;
}

/// A channel scoped to one interlocutor session.
#[async_trait]
pub trait InterlocutorChannel: Send + Sync {
    fn topic(&self) -> &str;

    /// Join and wait for the server acknowledgement.
    async fn join(&self) -> Result<JoinStatus, ChannelError>;

    async fn leave(&self) -> Result<(), ChannelError>;

    /// Queue a text reply authored by the interlocutor.
    async fn send_reply(
        &self,
        token: &str,
        message: &InterlocutorReplyMessage,
    ) -> Result<(), ChannelError>;

    fn on_bot_reply(&self) -> EventStream<BotReplyMessage>;

    fn on_agent_reply(&self) -> EventStream<AgentReplyMessage>;

    fn on_control_taken(&self) -> EventStream<ControlTakenMessage>;

    fn on_interlocutor_reply(&self) -> EventStream<InterlocutorReplyMessage>;
}

/// Identifiers needed to open an interlocutor channel.
#[derive(Clone)]
pub struct ChannelParams {
    pub bot_id: String,
    pub interlocutor_id: String,
    pub socket_token: Secret<String>,
}

impl std::fmt::Debug for ChannelParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelParams")
            .field("bot_id", &self.bot_id)
            .field("interlocutor_id", &self.interlocutor_id)
            .field("socket_token", &"[REDACTED]")
            .finish()
    }
}

/// Server acknowledgement of a join.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinStatus {
    pub response: serde_json::Value,
}
