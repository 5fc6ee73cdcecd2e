//! The chat session: one transcript, at most one joined channel.

use std::mem;

use {
    relaychat_channels::{ChannelEvent, ChannelParams, ConnectionState, WebChatService},
    relaychat_config::NoticesConfig,
    relaychat_sessions::{BootstrapClient, Session},
    secrecy::{ExposeSecret, Secret},
    tracing::{info, warn},
};

use crate::{
    error::RelayError,
    lifecycle::{JoinedChannel, Phase, join},
    outbound::{SendOutcome, send_user_message},
    relay::relay_event,
    transcript::{ChatMessage, Transcript},
};

/// Static settings of a chat session.
pub struct ChatOptions {
    pub bot_id: String,
    pub bot_token: Secret<String>,
    pub notices: NoticesConfig,
}

impl std::fmt::Debug for ChatOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatOptions")
            .field("bot_id", &self.bot_id)
            .field("bot_token", &"[REDACTED]")
            .field("notices", &self.notices)
            .finish()
    }
}

#[derive(Debug, Default)]
enum ChannelState {
    #[default]
    Unjoined,
    Joined(JoinedChannel),
}

/// Owns the session credentials, the transcript and the current join.
///
/// All mutation goes through `&mut self`, so a caller drives it from a
/// single task and never observes a half-applied transition.
#[derive(Debug)]
pub struct ChatSession {
    options: ChatOptions,
    session: Option<Session>,
    channel: ChannelState,
    transcript: Transcript,
    connection: ConnectionState,
}

impl ChatSession {
    pub fn new(options: ChatOptions) -> Self {
        Self {
            options,
            session: None,
            channel: ChannelState::Unjoined,
            transcript: Transcript::new(),
            connection: ConnectionState::default(),
        }
    }

    /// Bootstrap a session for `email`, then join its channel.
    ///
    /// Nothing is joined when bootstrap fails.
    pub async fn start(
        &mut self,
        client: &BootstrapClient,
        service: &dyn WebChatService,
        email: &str,
    ) -> Result<(), RelayError> {
        let session = match client.start_session(email).await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "bootstrap failed, staying unjoined");
                return Err(e.into());
            },
        };
        self.set_session(session);
        self.join(service).await
    }

    /// Install a provisioned session, replacing any previous one.
    pub fn set_session(&mut self, session: Session) {
        info!(interlocutor_id = session.interlocutor_id(), "session ready");
        self.session = Some(session);
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Phase {
        match self.channel {
            ChannelState::Unjoined => Phase::Unjoined,
            ChannelState::Joined(_) => Phase::Joined,
        }
    }

    pub fn joined(&self) -> Option<&JoinedChannel> {
        match &self.channel {
            ChannelState::Joined(joined) => Some(joined),
            ChannelState::Unjoined => None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Join the session's interlocutor channel.
    pub async fn join(&mut self, service: &dyn WebChatService) -> Result<(), RelayError> {
        if let ChannelState::Joined(_) = self.channel {
            return Err(RelayError::AlreadyJoined);
        }
        let session = self.session.as_ref().ok_or(RelayError::NoSession)?;
        let params = ChannelParams {
            bot_id: self.options.bot_id.clone(),
            interlocutor_id: session.interlocutor_id().to_string(),
            socket_token: Secret::new(session.socket_token().to_string()),
        };

        let joined = join(service, params).await?;
        self.channel = ChannelState::Joined(joined);
        Ok(())
    }

    /// Leave the current channel. The session is back to unjoined even when
    /// the leave request itself fails.
    pub async fn leave(&mut self) -> Result<(), RelayError> {
        match mem::take(&mut self.channel) {
            ChannelState::Joined(joined) => joined.leave().await,
            ChannelState::Unjoined => Err(RelayError::NotJoined),
        }
    }

    /// Wait for the next inbound event.
    ///
    /// Pending forever while unjoined; `None` once the joined channel's
    /// streams end.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        match &mut self.channel {
            ChannelState::Joined(joined) => joined.next_event().await,
            ChannelState::Unjoined => std::future::pending().await,
        }
    }

    /// Relay `event` into the transcript and return the new entries.
    pub fn handle_event(&mut self, event: ChannelEvent) -> &[ChatMessage] {
        relay_event(&mut self.transcript, event, &self.options.notices)
    }

    /// Append a USER entry and forward it on the joined channel.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let channel = match &self.channel {
            ChannelState::Joined(joined) => Some(joined),
            ChannelState::Unjoined => None,
        };
        send_user_message(
            &mut self.transcript,
            channel,
            self.options.bot_token.expose_secret(),
            text,
        )
        .await
    }

    pub fn record_connection_state(&mut self, state: ConnectionState) {
        if self.connection != state {
            info!(from = %self.connection, to = %state, "connection state changed");
            self.connection = state;
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }
}
