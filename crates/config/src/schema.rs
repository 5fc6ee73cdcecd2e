/// Config schema types (webchat endpoints, user identity, notices, socket tuning, display).
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayChatConfig {
    pub webchat: WebchatConfig,
    pub user: UserConfig,
    pub notices: NoticesConfig,
    pub socket: SocketConfig,
    pub display: DisplayConfig,
}

/// Endpoints and credentials of the webchat backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebchatConfig {
    /// Base URL of the REST API, e.g. `https://api.example.com/`.
    pub api_url: String,

    /// Websocket endpoint of the real-time socket.
    pub socket_url: String,

    /// Bot the interlocutor talks to.
    pub bot_id: String,

    /// Bot API token. Usually `${RELAYCHAT_BOT_TOKEN}`.
    pub bot_token: String,
}

/// The local user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Any value that identifies the user; hashed into the per-session user id.
    pub email: String,
}

/// Transcript lines appended when a human agent takes or releases control.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticesConfig {
    pub agent_joined: String,
    pub agent_left: String,
}

impl Default for NoticesConfig {
    fn default() -> Self {
        Self {
            agent_joined: "Un agent à rejoint la conversation".into(),
            agent_left: "Un agent à quitté la conversation".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocketConfig {
    /// Seconds between heartbeats; `0` disables them.
    pub heartbeat_interval_secs: u64,
    /// How long `join` waits for the server acknowledgement.
    pub request_timeout_secs: u64,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: 30,
            request_timeout_secs: 10,
        }
    }
}

/// How transcript senders are presented to a chat renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub user_name: String,
    pub agent_name: String,
    pub avatar_url: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            user_name: "USER".into(),
            agent_name: "AGENT".into(),
            avatar_url: "https://placeimg.com/140/140/any".into(),
        }
    }
}

impl RelayChatConfig {
    /// Dotted names of required fields that are empty or still hold an
    /// unresolved `${VAR}` placeholder, followed by unusable socket timings.
    pub fn validate(&self) -> Vec<&'static str> {
        let required = [
            ("webchat.api_url", &self.webchat.api_url),
            ("webchat.socket_url", &self.webchat.socket_url),
            ("webchat.bot_id", &self.webchat.bot_id),
            ("webchat.bot_token", &self.webchat.bot_token),
            ("user.email", &self.user.email),
        ];
        let mut invalid: Vec<_> = required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty() || value.contains("${"))
            .map(|(name, _)| name)
            .collect();
        // A zero heartbeat disables it; a zero timeout would fail every join.
        if self.socket.request_timeout_secs == 0 {
            invalid.push("socket.request_timeout_secs");
        }
        invalid
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_empty()
    }
}
