mod chat_commands;
mod config_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    relaychat_config::RelayChatConfig,
    relaychat_sessions::BootstrapClient,
    secrecy::Secret,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "relaychat", about = "Relaychat: terminal webchat client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to use instead of the discovered one.
    #[arg(long, global = true, env = "RELAYCHAT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Identifier to start the session with (defaults to `user.email`).
        #[arg(long)]
        email: Option<String>,
        /// Print transcript entries as JSON lines.
        #[arg(long, default_value_t = false)]
        jsonl: bool,
    },
    /// Provision an interlocutor and print its id.
    Bootstrap {
        #[arg(long)]
        email: Option<String>,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    // Logs go to stderr; stdout carries the transcript.
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load(cli: &Cli) -> anyhow::Result<RelayChatConfig> {
    match &cli.config {
        Some(path) => relaychat_config::load_config(path),
        None => Ok(relaychat_config::discover_and_load()),
    }
}

/// Refuse to go further with missing required settings.
fn ensure_complete(config: &RelayChatConfig) -> anyhow::Result<()> {
    let missing = config.validate();
    if !missing.is_empty() {
        anyhow::bail!("config is incomplete, missing or invalid: {}", missing.join(", "));
    }
    Ok(())
}

fn bootstrap_client(config: &RelayChatConfig) -> BootstrapClient {
    BootstrapClient::new(
        &config.webchat.api_url,
        &config.webchat.bot_id,
        Secret::new(config.webchat.bot_token.clone()),
    )
}

async fn bootstrap(config: &RelayChatConfig, email: Option<String>) -> anyhow::Result<()> {
    ensure_complete(config)?;
    let email = email.unwrap_or_else(|| config.user.email.clone());
    let session = bootstrap_client(config).start_session(&email).await?;
    println!("user_id={}", session.user_id());
    println!("interlocutor_id={}", session.interlocutor_id());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "relaychat starting");

    let config = load(&cli)?;
    match cli.command {
        Commands::Chat { email, jsonl } => {
            ensure_complete(&config)?;
            chat_commands::run_chat(&config, email, jsonl).await
        },
        Commands::Bootstrap { email } => bootstrap(&config, email).await,
        Commands::Config { action } => {
            config_commands::handle_config(action, &config, cli.config.as_deref())
        },
    }
}
