//! Channel lifecycle: UNJOINED -> JOINING -> JOINED -> LEAVING -> UNJOINED.
//!
//! [`join`] returns a [`JoinedChannel`] value and [`JoinedChannel::leave`]
//! consumes it, so a handle can never be used after it has left. Every join
//! builds a new channel handle and a new cancellation token; the token gates
//! the merged event stream, so cancelling it ends all four subscriptions at
//! once.

use std::{fmt, sync::Arc};

use {
    futures::{StreamExt, stream::BoxStream},
    relaychat_channels::{
        ChannelEvent, ChannelParams, InterlocutorChannel, WebChatService, subscribe_all,
    },
    relaychat_protocol::InterlocutorReplyMessage,
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
    uuid::Uuid,
};

use crate::error::RelayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unjoined,
    Joining,
    Joined,
    Leaving,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unjoined => "UNJOINED",
            Self::Joining => "JOINING",
            Self::Joined => "JOINED",
            Self::Leaving => "LEAVING",
        })
    }
}

/// A joined channel with its subscriptions.
pub struct JoinedChannel {
    join_id: Uuid,
    channel: Arc<dyn InterlocutorChannel>,
    cancel: CancellationToken,
    events: BoxStream<'static, ChannelEvent>,
}

impl fmt::Debug for JoinedChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinedChannel")
            .field("join_id", &self.join_id)
            .field("topic", &self.channel.topic())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

/// Build a fresh channel handle, join it, and subscribe once acknowledged.
pub async fn join(
    service: &dyn WebChatService,
    params: ChannelParams,
) -> Result<JoinedChannel, RelayError> {
    let channel = service.interlocutor_channel(params);
    info!(topic = channel.topic(), phase = %Phase::Joining, "joining channel");

    if let Err(e) = channel.join().await {
        warn!(topic = channel.topic(), error = %e, phase = %Phase::Unjoined, "join failed");
        return Err(e.into());
    }

    let cancel = CancellationToken::new();
    let events = subscribe_all(channel.as_ref())
        .take_until(cancel.clone().cancelled_owned())
        .boxed();
    let join_id = Uuid::new_v4();

    info!(topic = channel.topic(), %join_id, phase = %Phase::Joined, "channel joined");
    Ok(JoinedChannel {
        join_id,
        channel,
        cancel,
        events,
    })
}

impl JoinedChannel {
    /// Identifies this join; differs on every join.
    pub fn join_id(&self) -> Uuid {
        self.join_id
    }

    pub fn channel(&self) -> &Arc<dyn InterlocutorChannel> {
        &self.channel
    }

    /// The token gating this join's subscriptions.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Next inbound event. `None` once the subscriptions are cancelled or the
    /// underlying streams end.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        self.events.next().await
    }

    /// Forward a user message. The outcome is reported, never retried.
    pub async fn send_reply(&self, token: &str, text: &str) -> Result<(), RelayError> {
        self.channel
            .send_reply(token, &InterlocutorReplyMessage::text(text))
            .await
            .map_err(RelayError::from)
    }

    /// Leave the channel, then cancel every subscription of this join.
    ///
    /// Subscriptions are cancelled even if the leave request fails.
    pub async fn leave(self) -> Result<(), RelayError> {
        info!(topic = self.channel.topic(), join_id = %self.join_id, phase = %Phase::Leaving, "leaving channel");
        let result = self.channel.leave().await;
        self.cancel.cancel();

        match result {
            Ok(()) => {
                info!(topic = self.channel.topic(), phase = %Phase::Unjoined, "channel left");
                Ok(())
            },
            Err(e) => {
                warn!(topic = self.channel.topic(), error = %e, "leave request failed, subscriptions cancelled anyway");
                Err(e.into())
            },
        }
    }
}
