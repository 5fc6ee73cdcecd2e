//! Configuration loading for the relaychat client.
//!
//! Supports TOML, YAML and JSON files with `${ENV_VAR}` substitution.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{
        clear_config_dir, config_dir, discover_and_load, find_or_default_config_path,
        load_config, set_config_dir,
    },
    schema::{
        DisplayConfig, NoticesConfig, RelayChatConfig, SocketConfig, UserConfig, WebchatConfig,
    },
};
