//! Interactive chat loop: stdin lines in, transcript entries out.

use std::time::Duration;

use {
    futures::StreamExt,
    relaychat_channels::{SocketOptions, WebChatService, WebSocketService},
    relaychat_chat::{ChatMessage, ChatOptions, ChatSession},
    relaychat_config::{DisplayConfig, RelayChatConfig},
    secrecy::Secret,
    tokio::io::{AsyncBufReadExt, BufReader},
    tracing::{info, warn},
};

/// One line typed by the user.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Join,
    Leave,
    State,
    History,
    Quit,
    Message(&'a str),
    Empty,
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "" => Self::Empty,
            "/join" => Self::Join,
            "/leave" => Self::Leave,
            "/state" => Self::State,
            "/history" => Self::History,
            "/quit" | "/exit" => Self::Quit,
            text => Self::Message(text),
        }
    }
}

struct Printer<'a> {
    display: &'a DisplayConfig,
    jsonl: bool,
}

impl Printer<'_> {
    fn print(&self, message: &ChatMessage) {
        if self.jsonl {
            match serde_json::to_string(&message.render(self.display)) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "failed to encode transcript entry"),
            }
        } else {
            println!("{}", self.format(message));
        }
    }

    fn format(&self, message: &ChatMessage) -> String {
        let rendered = message.render(self.display);
        format!(
            "[{} #{}] {}: {}",
            message.created_at.format("%H:%M:%S"),
            message.id,
            rendered.user.name,
            message.text
        )
    }
}

fn socket_options(config: &RelayChatConfig) -> SocketOptions {
    SocketOptions {
        url: config.webchat.socket_url.clone(),
        heartbeat_interval: Duration::from_secs(config.socket.heartbeat_interval_secs),
        request_timeout: Duration::from_secs(config.socket.request_timeout_secs),
    }
}

pub async fn run_chat(
    config: &RelayChatConfig,
    email: Option<String>,
    jsonl: bool,
) -> anyhow::Result<()> {
    let email = email.unwrap_or_else(|| config.user.email.clone());
    let printer = Printer {
        display: &config.display,
        jsonl,
    };

    let service = WebSocketService::new(socket_options(config));
    let mut states = service.connection_state();
    // Bootstrap still runs without a socket; `/join` retries the connect.
    if let Err(e) = service.connect().await {
        warn!(error = %e, "socket connect failed");
    }

    let mut chat = ChatSession::new(ChatOptions {
        bot_id: config.webchat.bot_id.clone(),
        bot_token: Secret::new(config.webchat.bot_token.clone()),
        notices: config.notices.clone(),
    });

    // A failed start leaves the session unjoined; `/join` can retry the join
    // once a session exists.
    let client = crate::bootstrap_client(config);
    if let Err(e) = chat.start(&client, &service, &email).await {
        warn!(error = %e, "could not start chat session");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Input::parse(&line) {
                    Input::Empty => {},
                    Input::Quit => break,
                    Input::Join => {
                        if let Err(e) = service.connect().await {
                            warn!(error = %e, "socket connect failed");
                        } else if let Err(e) = chat.join(&service).await {
                            warn!(error = %e, "join failed");
                        }
                    },
                    Input::Leave => {
                        if let Err(e) = chat.leave().await {
                            warn!(error = %e, "leave failed");
                        }
                    },
                    Input::State => {
                        println!(
                            "connection: {}, channel: {}",
                            chat.connection_state(),
                            chat.phase()
                        );
                    },
                    Input::History => {
                        for message in chat.transcript().newest_first() {
                            printer.print(message);
                        }
                    },
                    Input::Message(text) => {
                        let outcome = chat.send(text).await;
                        if let Some(message) = chat.transcript().last() {
                            printer.print(message);
                        }
                        if let Err(e) = outcome.delivery {
                            warn!(message_id = outcome.message_id, error = %e, "message kept locally, not delivered");
                        }
                    },
                }
            },
            Some(state) = states.next() => chat.record_connection_state(state),
            event = chat.next_event() => match event {
                Some(event) => {
                    for message in chat.handle_event(event) {
                        printer.print(message);
                    }
                },
                None => {
                    warn!("channel subscriptions ended");
                    if let Err(e) = chat.leave().await {
                        warn!(error = %e, "leave after stream end failed");
                    }
                },
            },
        }
    }

    if chat.joined().is_some() {
        if let Err(e) = chat.leave().await {
            warn!(error = %e, "leave on exit failed");
        }
    }
    service.disconnect().await;
    info!(messages = chat.transcript().len(), "chat session closed");
    Ok(())
}
