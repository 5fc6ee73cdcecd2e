//! Identity provisioning: `POST bots/<bot>/interlocutors/clustaar_web_chat`.

use serde::{Deserialize, Serialize};

/// Request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterlocutorRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "userID")]
    pub user_id: String,
}

impl InterlocutorRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            kind: "interlocutor".into(),
            user_id: user_id.into(),
        }
    }
}

/// Response body. Every field is optional; callers decide what counts as usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterlocutorResponse {
    #[serde(default)]
    pub data: Option<InterlocutorData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterlocutorData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub socket_token: Option<String>,
}

impl InterlocutorResponse {
    /// `(id, socketToken)` when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let data = self.data.as_ref()?;
        let id = data.id.as_deref().filter(|s| !s.is_empty())?;
        let token = data.socket_token.as_deref().filter(|s| !s.is_empty())?;
        Some((id, token))
    }
}
