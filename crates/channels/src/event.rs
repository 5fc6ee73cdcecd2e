//! Fan-in of the four per-kind streams into one tagged stream.

use {
    futures::{StreamExt, stream},
    relaychat_protocol::{
        AgentReplyMessage, BotReplyMessage, ControlTakenMessage, InterlocutorReplyMessage,
    },
};

use crate::service::{EventStream, InterlocutorChannel};

/// Inbound event tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    BotReply(BotReplyMessage),
    AgentReply(AgentReplyMessage),
    ControlTaken(ControlTakenMessage),
    InterlocutorReply(InterlocutorReplyMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BotReply,
    AgentReply,
    ControlTaken,
    InterlocutorReply,
}

impl ChannelEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::BotReply(_) => EventKind::BotReply,
            Self::AgentReply(_) => EventKind::AgentReply,
            Self::ControlTaken(_) => EventKind::ControlTaken,
            Self::InterlocutorReply(_) => EventKind::InterlocutorReply,
        }
    }
}

/// Subscribe to all four event kinds of `channel`.
///
/// Order is preserved within a kind only; kinds interleave as they arrive.
pub fn subscribe_all(channel: &dyn InterlocutorChannel) -> EventStream<ChannelEvent> {
    stream::select_all([
        channel.on_bot_reply().map(ChannelEvent::BotReply).boxed(),
        channel.on_agent_reply().map(ChannelEvent::AgentReply).boxed(),
        channel
            .on_control_taken()
            .map(ChannelEvent::ControlTaken)
            .boxed(),
        channel
            .on_interlocutor_reply()
            .map(ChannelEvent::InterlocutorReply)
            .boxed(),
    ])
    .boxed()
}
