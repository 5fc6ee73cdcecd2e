//! Webchat relay: bootstrap a session, join its interlocutor channel, and
//! keep a transcript of everything exchanged on it.

pub mod error;
pub mod lifecycle;
pub mod outbound;
pub mod relay;
pub mod session;
pub mod transcript;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod fake;

pub use {
    error::RelayError,
    lifecycle::{JoinedChannel, Phase, join},
    outbound::{SendOutcome, send_user_message},
    relay::relay_event,
    session::{ChatOptions, ChatSession},
    transcript::{ChatMessage, ChatUser, RenderedMessage, SenderRole, Transcript},
};
