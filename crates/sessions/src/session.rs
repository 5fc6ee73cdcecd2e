use secrecy::{ExposeSecret, Secret};

/// A provisioned interlocutor session. Immutable once created; a new login
/// replaces it wholesale.
#[derive(Debug)]
pub struct Session {
    email: String,
    user_id: String,
    interlocutor_id: String,
    socket_token: Secret<String>,
}

impl Session {
    pub fn new(
        email: impl Into<String>,
        user_id: impl Into<String>,
        interlocutor_id: impl Into<String>,
        socket_token: Secret<String>,
    ) -> Self {
        Self {
            email: email.into(),
            user_id: user_id.into(),
            interlocutor_id: interlocutor_id.into(),
            socket_token,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn interlocutor_id(&self) -> &str {
        &self.interlocutor_id
    }

    pub fn socket_token(&self) -> &str {
        self.socket_token.expose_secret()
    }
}
