//! Outbound user messages.

use tracing::{debug, warn};

use crate::{
    error::RelayError,
    lifecycle::JoinedChannel,
    transcript::{SenderRole, Transcript},
};

/// Result of sending one user message.
///
/// The transcript entry exists whatever `delivery` says.
#[derive(Debug)]
pub struct SendOutcome {
    pub message_id: u64,
    pub delivery: Result<(), RelayError>,
}

impl SendOutcome {
    pub fn delivered(&self) -> bool {
        self.delivery.is_ok()
    }
}

/// Append `text` as a USER entry, then forward it on `channel`.
///
/// The entry is appended before the send is attempted, so it stays in the
/// transcript when there is no channel or the send fails.
pub async fn send_user_message(
    transcript: &mut Transcript,
    channel: Option<&JoinedChannel>,
    bot_token: &str,
    text: &str,
) -> SendOutcome {
    let message_id = transcript.push(text, SenderRole::User).id;

    let delivery = match channel {
        Some(channel) => channel.send_reply(bot_token, text).await,
        None => Err(RelayError::NotJoined),
    };

    match &delivery {
        Ok(()) => debug!(message_id, "user message sent"),
        Err(e) => warn!(message_id, error = %e, "user message not delivered"),
    }

    SendOutcome {
        message_id,
        delivery,
    }
}
