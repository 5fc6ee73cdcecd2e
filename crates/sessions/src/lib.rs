//! Session bootstrap.
//!
//! A session is provisioned once per start: the user's identifier is hashed
//! with the current time into a per-session user id, which is exchanged over
//! HTTP for an interlocutor id and a socket token.

pub mod bootstrap;
pub mod session;
pub mod user_id;

pub use {
    bootstrap::{BootstrapClient, BootstrapError},
    session::Session,
    user_id::{derive_user_id, user_id_now},
};
