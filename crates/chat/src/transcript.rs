//! Append-only chat transcript.

use std::fmt;

use {
    chrono::{DateTime, Utc},
    relaychat_config::DisplayConfig,
    serde::Serialize,
};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SenderRole {
    User,
    Agent,
}

impl SenderRole {
    /// Renderer-side user id: the local user is always 1, everyone else 2.
    pub fn display_id(self) -> u32 {
        match self {
            Self::User => 1,
            Self::Agent => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Agent => "AGENT",
        }
    }
}

impl fmt::Display for SenderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transcript entry. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub role: SenderRole,
}

/// A message in the shape chat widgets consume (`_id`, `createdAt`, `user`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMessage<'a> {
    #[serde(rename = "_id")]
    pub id: u64,
    pub text: &'a str,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub user: ChatUser<'a>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatUser<'a> {
    #[serde(rename = "_id")]
    pub id: u32,
    pub name: &'a str,
    pub avatar: &'a str,
}

impl ChatMessage {
    pub fn render<'a>(&'a self, display: &'a DisplayConfig) -> RenderedMessage<'a> {
        let name = match self.role {
            SenderRole::User => display.user_name.as_str(),
            SenderRole::Agent => display.agent_name.as_str(),
        };
        RenderedMessage {
            id: self.id,
            text: &self.text,
            created_at: self.created_at,
            user: ChatUser {
                id: self.role.display_id(),
                name,
                avatar: &display.avatar_url,
            },
        }
    }
}

/// Ordered list of messages with a strictly increasing id counter shared by
/// inbound and outbound entries.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    last_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return it.
    pub fn push(&mut self, text: impl Into<String>, role: SenderRole) -> &ChatMessage {
        self.last_id += 1;
        let index = self.messages.len();
        self.messages.push(ChatMessage {
            id: self.last_id,
            text: text.into(),
            created_at: Utc::now(),
            role,
        });
        &self.messages[index]
    }

    /// Messages in append order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Messages appended after the first `len`.
    pub fn since(&self, len: usize) -> &[ChatMessage] {
        self.messages.get(len..).unwrap_or_default()
    }

    /// Latest message first, as chat widgets render them.
    pub fn newest_first(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().rev()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
