use std::path::{Path, PathBuf};

use {clap::Subcommand, relaychat_config::RelayChatConfig};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective config with secrets redacted.
    Show,
    /// Print the path of the config file in use.
    Path,
    /// Report missing or invalid required settings.
    Check,
}

pub fn handle_config(
    action: ConfigAction,
    config: &RelayChatConfig,
    explicit: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", render(config)?);
            Ok(())
        },
        ConfigAction::Path => {
            println!("{}", config_path(explicit).display());
            Ok(())
        },
        ConfigAction::Check => {
            let missing = config.validate();
            if missing.is_empty() {
                println!("config is complete");
                return Ok(());
            }
            for field in &missing {
                println!("missing or invalid: {field}");
            }
            anyhow::bail!("{} required setting(s) missing or invalid", missing.len())
        },
    }
}

fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(relaychat_config::find_or_default_config_path)
}

fn render(config: &RelayChatConfig) -> anyhow::Result<String> {
    let mut redacted = config.clone();
    if !redacted.webchat.bot_token.is_empty() {
        redacted.webchat.bot_token = "[REDACTED]".into();
    }
    Ok(toml::to_string_pretty(&redacted)?)
}
