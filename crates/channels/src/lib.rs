//! Real-time channel surface.
//!
//! [`WebChatService`] owns the socket and builds [`InterlocutorChannel`]
//! handles; each handle exposes join/leave/send plus one stream per inbound
//! event kind. [`subscribe_all`] merges those into a single tagged stream.

pub mod error;
pub mod event;
pub mod service;
pub mod socket;
pub mod state;

pub use {
    error::ChannelError,
    event::{ChannelEvent, EventKind, subscribe_all},
    service::{ChannelParams, EventStream, InterlocutorChannel, JoinStatus, WebChatService},
    socket::{SocketOptions, WebSocketService},
    state::ConnectionState,
};
