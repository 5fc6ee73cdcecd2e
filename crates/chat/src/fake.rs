//! In-memory webchat service for tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use {
    async_trait::async_trait,
    futures::{StreamExt, future},
    relaychat_channels::{
        ChannelError, ChannelParams, ConnectionState, EventStream, InterlocutorChannel,
        JoinStatus, WebChatService,
    },
    relaychat_protocol::{
        AgentReplyMessage, BotReplyMessage, ControlTakenMessage, InterlocutorReplyMessage,
        interlocutor_topic,
    },
    secrecy::Secret,
    tokio::sync::broadcast,
    tokio_stream::wrappers::BroadcastStream,
};

pub(crate) fn params() -> ChannelParams {
    ChannelParams {
        bot_id: "bot-1".into(),
        interlocutor_id: "int-1".into(),
        socket_token: Secret::new("sock-1".into()),
    }
}

#[derive(Default, Clone, Copy)]
struct Failures {
    join: bool,
    leave: bool,
    send: bool,
}

#[derive(Default)]
pub(crate) struct FakeService {
    channels: Mutex<Vec<Arc<FakeChannel>>>,
    failures: Failures,
}

impl FakeService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_join(mut self) -> Self {
        self.failures.join = true;
        self
    }

    pub(crate) fn failing_leave(mut self) -> Self {
        self.failures.leave = true;
        self
    }

    pub(crate) fn failing_send(mut self) -> Self {
        self.failures.send = true;
        self
    }

    /// Number of channel handles built so far.
    pub(crate) fn created(&self) -> usize {
        self.channels.lock().unwrap().len()
    }

    pub(crate) fn last_channel(&self) -> Option<Arc<FakeChannel>> {
        self.channels.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl WebChatService for FakeService {
    async fn connect(&self) -> Result<(), ChannelError> {
        Ok(())
    }

    fn connection_state(&self) -> EventStream<ConnectionState> {
        futures::stream::iter([ConnectionState::Connecting, ConnectionState::Open]).boxed()
    }

    fn interlocutor_channel(&self, params: ChannelParams) -> Arc<dyn InterlocutorChannel> {
        let channel = Arc::new(FakeChannel::new(&params, self.failures));
        self.channels.lock().unwrap().push(Arc::clone(&channel));
        channel
    }
}

pub(crate) struct FakeChannel {
    topic: String,
    failures: Failures,
    joins: AtomicUsize,
    leaves: AtomicUsize,
    sent: Mutex<Vec<(String, InterlocutorReplyMessage)>>,
    bot: broadcast::Sender<BotReplyMessage>,
    agent: broadcast::Sender<AgentReplyMessage>,
    control: broadcast::Sender<ControlTakenMessage>,
    interlocutor: broadcast::Sender<InterlocutorReplyMessage>,
}

fn stream_of<T: Clone + Send + 'static>(tx: &broadcast::Sender<T>) -> EventStream<T> {
    BroadcastStream::new(tx.subscribe())
        .filter_map(|item| future::ready(item.ok()))
        .boxed()
}

impl FakeChannel {
    fn new(params: &ChannelParams, failures: Failures) -> Self {
        Self {
            topic: interlocutor_topic(&params.interlocutor_id),
            failures,
            joins: AtomicUsize::new(0),
            leaves: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            bot: broadcast::channel(16).0,
            agent: broadcast::channel(16).0,
            control: broadcast::channel(16).0,
            interlocutor: broadcast::channel(16).0,
        }
    }

    pub(crate) fn joins(&self) -> usize {
        self.joins.load(Ordering::SeqCst)
    }

    pub(crate) fn leaves(&self) -> usize {
        self.leaves.load(Ordering::SeqCst)
    }

    pub(crate) fn sent(&self) -> Vec<(String, InterlocutorReplyMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn push_bot(&self, msg: BotReplyMessage) {
        let _ = self.bot.send(msg);
    }

    pub(crate) fn push_agent(&self, msg: AgentReplyMessage) {
        let _ = self.agent.send(msg);
    }

    pub(crate) fn push_control(&self, msg: ControlTakenMessage) {
        let _ = self.control.send(msg);
    }

    pub(crate) fn push_interlocutor(&self, msg: InterlocutorReplyMessage) {
        let _ = self.interlocutor.send(msg);
    }
}

#[async_trait]
impl InterlocutorChannel for FakeChannel {
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn join(&self) -> Result<JoinStatus, ChannelError> {
        self.joins.fetch_add(1, Ordering::SeqCst);
        if self.failures.join {
            return Err(ChannelError::JoinRejected {
                topic: self.topic.clone(),
                reason: "unauthorized".into(),
            });
        }
        Ok(JoinStatus::default())
    }

    async fn leave(&self) -> Result<(), ChannelError> {
        self.leaves.fetch_add(1, Ordering::SeqCst);
        if self.failures.leave {
            return Err(ChannelError::Closed);
        }
        Ok(())
    }

    async fn send_reply(
        &self,
        token: &str,
        message: &InterlocutorReplyMessage,
    ) -> Result<(), ChannelError> {
        if self.failures.send {
            return Err(ChannelError::NotConnected);
        }
        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), message.clone()));
        Ok(())
    }

    fn on_bot_reply(&self) -> EventStream<BotReplyMessage> {
        stream_of(&self.bot)
    }

    fn on_agent_reply(&self) -> EventStream<AgentReplyMessage> {
        stream_of(&self.agent)
    }

    fn on_control_taken(&self) -> EventStream<ControlTakenMessage> {
        stream_of(&self.control)
    }

    fn on_interlocutor_reply(&self) -> EventStream<InterlocutorReplyMessage> {
        stream_of(&self.interlocutor)
    }
}
