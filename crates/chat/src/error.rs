use {relaychat_channels::ChannelError, relaychat_sessions::BootstrapError};

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("no session: bootstrap has not succeeded")]
    NoSession,

    #[error("already joined")]
    AlreadyJoined,

    #[error("not joined")]
    NotJoined,

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
