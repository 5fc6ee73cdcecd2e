//! Inbound event relay: one channel event in, zero or more transcript entries out.

use {relaychat_channels::ChannelEvent, relaychat_config::NoticesConfig, tracing::debug};

use crate::transcript::{ChatMessage, SenderRole, Transcript};

/// Append the transcript entries for `event` and return them.
///
/// - bot reply: one AGENT entry per `send_text_action`, in action order
/// - agent reply: one AGENT entry
/// - control taken: one AGENT notice, joined or left
/// - interlocutor reply: one USER entry
pub fn relay_event<'t>(
    transcript: &'t mut Transcript,
    event: ChannelEvent,
    notices: &NoticesConfig,
) -> &'t [ChatMessage] {
    let start = transcript.len();
    let kind = event.kind();

    match event {
        ChannelEvent::BotReply(reply) => {
            for text in reply.texts() {
                transcript.push(text, SenderRole::Agent);
            }
        },
        ChannelEvent::AgentReply(reply) => {
            transcript.push(reply.message, SenderRole::Agent);
        },
        ChannelEvent::ControlTaken(control) => {
            let notice = if control.value {
                &notices.agent_joined
            } else {
                &notices.agent_left
            };
            transcript.push(notice.as_str(), SenderRole::Agent);
        },
        ChannelEvent::InterlocutorReply(reply) => {
            transcript.push(reply.message, SenderRole::User);
        },
    }

    let appended = transcript.since(start);
    debug!(?kind, appended = appended.len(), "relayed event");
    appended
}
