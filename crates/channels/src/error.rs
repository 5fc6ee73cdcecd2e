use tokio_tungstenite::tungstenite;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("socket is not connected")]
    NotConnected,

    #[error("invalid socket url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("websocket transport error: {0}")]
    Transport(#[from] Box<tungstenite::Error>),

    #[error("join on {topic} rejected: {reason}")]
    JoinRejected { topic: String, reason: String },

    #[error("{operation} timed out")]
    Timeout { operation: &'static str },

    #[error("socket closed")]
    Closed,

    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}
