//! HTTP identity provisioning.

use {
    relaychat_protocol::{InterlocutorRequest, InterlocutorResponse},
    reqwest::{StatusCode, header::ACCEPT},
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, info},
};

use crate::{session::Session, user_id::user_id_now};

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("bootstrap request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bootstrap response (HTTP {status}) is not valid JSON: {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("bootstrap response (HTTP {status}) lacks data.id or data.socketToken")]
    Incomplete { status: StatusCode },
}

/// Exchanges a per-session user id for interlocutor credentials.
pub struct BootstrapClient {
    client: reqwest::Client,
    api_url: String,
    bot_id: String,
    bot_token: Secret<String>,
}

impl std::fmt::Debug for BootstrapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapClient")
            .field("api_url", &self.api_url)
            .field("bot_id", &self.bot_id)
            .field("bot_token", &"[REDACTED]")
            .finish()
    }
}

impl BootstrapClient {
    pub fn new(
        api_url: impl Into<String>,
        bot_id: impl Into<String>,
        bot_token: Secret<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            bot_id: bot_id.into(),
            bot_token,
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/bots/{}/interlocutors/clustaar_web_chat?use_websocket=true",
            self.api_url.trim_end_matches('/'),
            self.bot_id
        )
    }

    /// Derive a user id for `email` at the current time and provision it.
    pub async fn start_session(&self, email: &str) -> Result<Session, BootstrapError> {
        let user_id = user_id_now(email);
        self.provision(email, &user_id).await
    }

    /// POST the user id and extract `data.id` / `data.socketToken`.
    ///
    /// The HTTP status is not checked: error responses simply fail to carry
    /// credentials and come back as [`BootstrapError::Incomplete`].
    pub async fn provision(&self, email: &str, user_id: &str) -> Result<Session, BootstrapError> {
        debug!(bot_id = %self.bot_id, user_id, "provisioning interlocutor");

        let resp = self
            .client
            .post(self.endpoint())
            .header(ACCEPT, "application/json")
            .bearer_auth(self.bot_token.expose_secret())
            .json(&InterlocutorRequest::new(user_id))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        let parsed: InterlocutorResponse = serde_json::from_slice(&body)
            .map_err(|source| BootstrapError::Decode { status, source })?;

        let (interlocutor_id, socket_token) = parsed
            .credentials()
            .ok_or(BootstrapError::Incomplete { status })?;

        info!(interlocutor_id, "interlocutor provisioned");
        Ok(Session::new(
            email,
            user_id,
            interlocutor_id,
            Secret::new(socket_token.to_string()),
        ))
    }
}
