//! Websocket implementation of [`WebChatService`] / [`InterlocutorChannel`].
//!
//! One socket task pair per service: a writer fed by an unbounded queue and a
//! reader that routes `phx_reply` frames to the pending request with the same
//! `ref` and broadcasts every other frame to channel subscribers. A heartbeat
//! task keeps the socket alive. There is no reconnect: when the socket drops
//! the state moves to `closed`, pending requests fail and event streams end.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use {
    async_trait::async_trait,
    futures::{SinkExt, StreamExt, future, stream},
    relaychat_protocol::{
        AgentReplyMessage, BotReplyMessage, ControlTakenMessage, Frame, HEARTBEAT_TOPIC,
        InterlocutorReplyMessage, ReplyPayload, SOCKET_VSN, decode_payload, events,
        interlocutor_topic,
    },
    secrecy::{ExposeSecret, Secret},
    serde::de::DeserializeOwned,
    serde_json::Value,
    tokio::{
        sync::{Mutex, broadcast, mpsc, oneshot, watch},
        task::JoinHandle,
    },
    tokio_stream::wrappers::{BroadcastStream, WatchStream, errors::BroadcastStreamRecvError},
    tokio_tungstenite::tungstenite::Message,
    tracing::{debug, info, trace, warn},
};

use crate::{
    error::ChannelError,
    service::{ChannelParams, EventStream, InterlocutorChannel, JoinStatus, WebChatService},
    state::ConnectionState,
};

/// Inbound frames buffered per subscriber before it starts lagging.
const INBOUND_CAPACITY: usize = 256;

/// Socket tuning.
#[derive(Debug, Clone)]
pub struct SocketOptions {
    pub url: String,
    pub heartbeat_interval: Duration,
    pub request_timeout: Duration,
}

impl SocketOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            heartbeat_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Socket URL with the serializer version appended.
    pub fn endpoint(&self) -> Result<url::Url, ChannelError> {
        let mut url = url::Url::parse(&self.url).map_err(|e| ChannelError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ChannelError::InvalidUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        url.query_pairs_mut().append_pair("vsn", SOCKET_VSN);
        Ok(url)
    }
}

struct SocketInner {
    options: SocketOptions,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    pending: Mutex<HashMap<String, oneshot::Sender<Frame>>>,
    next_ref: AtomicU64,
    /// Pushed frames in arrival order; `None` marks the socket closing.
    inbound: broadcast::Sender<Option<Frame>>,
    state: watch::Sender<ConnectionState>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SocketInner {
    fn make_ref(&self) -> String {
        self.next_ref.fetch_add(1, Ordering::SeqCst).to_string()
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!(from = %previous, to = %state, "socket state changed");
        }
    }

    async fn sender(&self) -> Result<mpsc::UnboundedSender<String>, ChannelError> {
        self.outbound
            .lock()
            .await
            .clone()
            .ok_or(ChannelError::NotConnected)
    }

    /// Queue a frame without waiting for a reply.
    async fn push(&self, frame: Frame) -> Result<(), ChannelError> {
        let sender = self.sender().await?;
        let text = frame.encode()?;
        trace!(raw = %text, "client -> socket");
        sender.send(text).map_err(|_| ChannelError::Closed)
    }

    /// Send a frame and wait for the `phx_reply` carrying the same ref.
    async fn request(
        &self,
        join_ref: Option<String>,
        topic: &str,
        event: &'static str,
        payload: Value,
    ) -> Result<Frame, ChannelError> {
        let sender = self.sender().await?;
        let msg_ref = self.make_ref();
        let frame = Frame::new(join_ref, Some(msg_ref.clone()), topic, event, payload);
        let text = frame.encode()?;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(msg_ref.clone(), tx);

        trace!(raw = %text, "client -> socket");
        if sender.send(text).is_err() {
            self.pending.lock().await.remove(&msg_ref);
            return Err(ChannelError::Closed);
        }

        match tokio::time::timeout(self.options.request_timeout, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(ChannelError::Closed),
            Err(_) => {
                self.pending.lock().await.remove(&msg_ref);
                Err(ChannelError::Timeout { operation: event })
            },
        }
    }

    async fn route(&self, raw: &str) {
        trace!(raw = %raw, "socket -> client");
        let frame = match Frame::decode(raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "ignoring undecodable socket frame");
                return;
            },
        };

        if frame.is_reply() {
            if let Some(msg_ref) = frame.msg_ref() {
                let waiter = self.pending.lock().await.remove(msg_ref);
                if let Some(tx) = waiter {
                    let _ = tx.send(frame);
                    return;
                }
            }
            if frame.topic() != HEARTBEAT_TOPIC {
                debug!(topic = %frame.topic(), "reply for unknown request ref");
            }
            return;
        }

        if matches!(frame.event(), events::ERROR | events::CLOSE) {
            warn!(topic = %frame.topic(), event = %frame.event(), "channel closed by server");
        }

        // No subscribers is not an error.
        let _ = self.inbound.send(Some(frame));
    }

    async fn on_closed(&self) {
        self.outbound.lock().await.take();
        // Dropping the senders fails every pending request with `Closed`.
        self.pending.lock().await.clear();
        self.set_state(ConnectionState::Closed);
        // Ends every event stream once it has drained the frames before it.
        let _ = self.inbound.send(None);
        info!("socket closed");
    }
}

/// Webchat service backed by a single websocket.
#[derive(Clone)]
pub struct WebSocketService {
    inner: Arc<SocketInner>,
}

impl WebSocketService {
    pub fn new(options: SocketOptions) -> Self {
        let (inbound, _) = broadcast::channel(INBOUND_CAPACITY);
        let (state, _) = watch::channel(ConnectionState::Closed);
        Self {
            inner: Arc::new(SocketInner {
                options,
                outbound: Mutex::new(None),
                pending: Mutex::new(HashMap::new()),
                next_ref: AtomicU64::new(1),
                inbound,
                state,
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    /// Close the socket and stop its tasks.
    pub async fn disconnect(&self) {
        self.inner.set_state(ConnectionState::Closing);
        for handle in self.inner.tasks.lock().await.drain(..) {
            handle.abort();
        }
        self.inner.on_closed().await;
    }
}

#[async_trait]
impl WebChatService for WebSocketService {
    async fn connect(&self) -> Result<(), ChannelError> {
        let mut outbound = self.inner.outbound.lock().await;
        if outbound.is_some() {
            return Ok(());
        }

        let endpoint = self.inner.options.endpoint()?;
        self.inner.set_state(ConnectionState::Connecting);
        info!(url = %self.inner.options.url, "connecting socket");

        let (ws, _response) = match tokio_tungstenite::connect_async(endpoint.as_str()).await {
            Ok(conn) => conn,
            Err(e) => {
                self.inner.set_state(ConnectionState::Closed);
                return Err(ChannelError::Transport(Box::new(e)));
            },
        };
        let (mut sink, mut stream) = ws.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        *outbound = Some(tx.clone());
        drop(outbound);
        self.inner.set_state(ConnectionState::Open);

        let writer = tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    warn!(error = %e, "socket write failed");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let reader_inner = Arc::clone(&self.inner);
        let reader = tokio::spawn(async move {
            loop {
                match stream.next().await {
                    Some(Ok(Message::Text(text))) => reader_inner.route(text.as_str()).await,
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("socket closed by server");
                        break;
                    },
                    Some(Ok(_)) => {},
                    Some(Err(e)) => {
                        warn!(error = %e, "socket read failed");
                        break;
                    },
                }
            }
            reader_inner.on_closed().await;
        });

        let mut spawned = vec![writer, reader];
        let period = self.inner.options.heartbeat_interval;
        if period.is_zero() {
            debug!("heartbeat disabled");
        } else {
            spawned.push(spawn_heartbeat(Arc::clone(&self.inner), period));
        }

        let mut tasks = self.inner.tasks.lock().await;
        tasks.retain(|h| !h.is_finished());
        tasks.extend(spawned);
        Ok(())
    }

    fn connection_state(&self) -> EventStream<ConnectionState> {
        WatchStream::new(self.inner.state.subscribe()).boxed()
    }

    fn interlocutor_channel(&self, params: ChannelParams) -> Arc<dyn InterlocutorChannel> {
        Arc::new(WebSocketChannel::new(Arc::clone(&self.inner), params))
    }
}

/// Push a `heartbeat` on the `phoenix` topic every `period` until the socket
/// goes away. `period` must be non-zero.
fn spawn_heartbeat(inner: Arc<SocketInner>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            ticker.tick().await;
            let frame = Frame::new(
                None,
                Some(inner.make_ref()),
                HEARTBEAT_TOPIC,
                events::HEARTBEAT,
                Value::Object(Default::default()),
            );
            if inner.push(frame).await.is_err() {
                break;
            }
        }
    })
}

/// Channel handle on topic `interlocutor:<id>`.
pub struct WebSocketChannel {
    socket: Arc<SocketInner>,
    topic: String,
    join_ref: String,
    bot_id: String,
    socket_token: Secret<String>,
}

impl WebSocketChannel {
    fn new(socket: Arc<SocketInner>, params: ChannelParams) -> Self {
        let join_ref = socket.make_ref();
        Self {
            topic: interlocutor_topic(&params.interlocutor_id),
            bot_id: params.bot_id,
            socket_token: params.socket_token,
            join_ref,
            socket,
        }
    }

    fn join_payload(&self) -> Value {
        serde_json::json!({
            "bot_id": self.bot_id,
            "token": self.socket_token.expose_secret(),
        })
    }

    /// Stream of `event` pushes on this topic. It ends when the socket
    /// closes; one taken while the socket is already closed is empty.
    fn subscribe<T>(&self, event: &'static str) -> EventStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        // Subscribe before reading the state: the close marker is sent after
        // the state flips, so either it is seen here or it reaches `receiver`.
        let receiver = self.socket.inbound.subscribe();
        if *self.socket.state.borrow() == ConnectionState::Closed {
            return stream::empty().boxed();
        }
        let topic = self.topic.clone();
        BroadcastStream::new(receiver)
            .take_while(|item| future::ready(!matches!(item, Ok(None))))
            .filter_map(move |item| future::ready(decode_event(&topic, event, item)))
            .boxed()
    }
}

fn decode_event<T: DeserializeOwned>(
    topic: &str,
    event: &str,
    item: Result<Option<Frame>, BroadcastStreamRecvError>,
) -> Option<T> {
    match item {
        Ok(Some(frame)) if frame.topic() == topic && frame.event() == event => {
            match decode_payload(frame.into_payload()) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(topic, event, error = %e, "dropping undecodable event payload");
                    None
                },
            }
        },
        Ok(_) => None,
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(topic, event, skipped, "subscriber lagged, events dropped");
            None
        },
    }
}

#[async_trait]
impl InterlocutorChannel for WebSocketChannel {
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn join(&self) -> Result<JoinStatus, ChannelError> {
        let reply = self
            .socket
            .request(
                Some(self.join_ref.clone()),
                &self.topic,
                events::JOIN,
                self.join_payload(),
            )
            .await?;

        let response = reply.reply_response().cloned().unwrap_or(Value::Null);
        match reply.reply_status() {
            Some("ok") => {
                info!(topic = %self.topic, "joined channel");
                Ok(JoinStatus { response })
            },
            _ => Err(ChannelError::JoinRejected {
                topic: self.topic.clone(),
                reason: response.to_string(),
            }),
        }
    }

    async fn leave(&self) -> Result<(), ChannelError> {
        self.socket
            .request(
                Some(self.join_ref.clone()),
                &self.topic,
                events::LEAVE,
                Value::Object(Default::default()),
            )
            .await?;
        info!(topic = %self.topic, "left channel");
        Ok(())
    }

    async fn send_reply(
        &self,
        token: &str,
        message: &InterlocutorReplyMessage,
    ) -> Result<(), ChannelError> {
        let payload = serde_json::to_value(ReplyPayload { token, message })?;
        let frame = Frame::new(
            Some(self.join_ref.clone()),
            Some(self.socket.make_ref()),
            self.topic.as_str(),
            events::REPLY,
            payload,
        );
        self.socket.push(frame).await
    }

    fn on_bot_reply(&self) -> EventStream<BotReplyMessage> {
        self.subscribe(events::BOT_REPLY)
    }

    fn on_agent_reply(&self) -> EventStream<AgentReplyMessage> {
        self.subscribe(events::AGENT_REPLY)
    }

    fn on_control_taken(&self) -> EventStream<ControlTakenMessage> {
        self.subscribe(events::CONTROL_TAKEN)
    }

    fn on_interlocutor_reply(&self) -> EventStream<InterlocutorReplyMessage> {
        self.subscribe(events::INTERLOCUTOR_REPLY)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::event::{ChannelEvent, EventKind, subscribe_all},
        tokio::net::{TcpListener, TcpStream},
        tokio_tungstenite::WebSocketStream,
    };

    type ServerWs = WebSocketStream<TcpStream>;

    async fn listen() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/socket/websocket", listener.local_addr().unwrap());
        (listener, url)
    }

    async fn accept(listener: &TcpListener) -> ServerWs {
        let (stream, _) = listener.accept().await.unwrap();
        tokio_tungstenite::accept_async(stream).await.unwrap()
    }

    /// Next non-heartbeat frame sent by the client.
    async fn next_frame(ws: &mut ServerWs) -> Frame {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    let frame = Frame::decode(text.as_str()).unwrap();
                    if frame.event() != events::HEARTBEAT {
                        return frame;
                    }
                },
                Some(Ok(_)) => continue,
                other => panic!("client socket ended: {other:?}"),
            }
        }
    }

    async fn send(ws: &mut ServerWs, frame: Frame) {
        ws.send(Message::Text(frame.encode().unwrap().into()))
            .await
            .unwrap();
    }

    async fn reply(ws: &mut ServerWs, to: &Frame, status: &str, response: Value) {
        let frame = Frame::new(
            to.join_ref().map(String::from),
            to.msg_ref().map(String::from),
            to.topic(),
            events::SERVER_REPLY,
            serde_json::json!({"status": status, "response": response}),
        );
        send(ws, frame).await;
    }

    fn options(url: String) -> SocketOptions {
        SocketOptions {
            url,
            heartbeat_interval: Duration::from_secs(60),
            request_timeout: Duration::from_secs(5),
        }
    }

    fn params() -> ChannelParams {
        ChannelParams {
            bot_id: "bot-1".into(),
            interlocutor_id: "int-1".into(),
            socket_token: Secret::new("sock-tok".into()),
        }
    }

    #[test]
    fn endpoint_appends_vsn() {
        let url = SocketOptions::new("wss://ws.example.com/socket/websocket")
            .endpoint()
            .unwrap();
        assert_eq!(
            url.as_str(),
            "wss://ws.example.com/socket/websocket?vsn=2.0.0"
        );
    }

    #[test]
    fn endpoint_rejects_http_scheme() {
        let err = SocketOptions::new("https://example.com")
            .endpoint()
            .unwrap_err();
        assert!(matches!(err, ChannelError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn connect_to_closed_port_fails() {
        let (listener, url) = listen().await;
        drop(listener);
        let service = WebSocketService::new(options(url));
        let result = service.connect().await;
        assert!(matches!(result, Err(ChannelError::Transport(_))));
        assert_eq!(service.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn join_without_connect_is_not_connected() {
        let service = WebSocketService::new(options("ws://127.0.0.1:9/".into()));
        let channel = service.interlocutor_channel(params());
        let result = channel.join().await;
        assert!(matches!(result, Err(ChannelError::NotConnected)));
    }

    #[tokio::test]
    async fn join_relay_and_leave_round_trip() {
        let (listener, url) = listen().await;

        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;

            let join = next_frame(&mut ws).await;
            assert_eq!(join.event(), events::JOIN);
            assert_eq!(join.topic(), "interlocutor:int-1");
            assert_eq!(join.payload()["token"], "sock-tok");
            assert_eq!(join.payload()["bot_id"], "bot-1");
            reply(&mut ws, &join, "ok", serde_json::json!({})).await;

            let outbound = next_frame(&mut ws).await;
            assert_eq!(outbound.event(), events::REPLY);
            assert_eq!(outbound.payload()["token"], "bot-token");
            assert_eq!(outbound.payload()["message"]["message"], "hello");

            let topic = "interlocutor:int-1";
            let pushes = [
                (
                    events::BOT_REPLY,
                    serde_json::json!({"fulfillment": {"actions": [
                        {"type": "send_text_action", "text": "from bot"}
                    ]}}),
                ),
                (events::AGENT_REPLY, serde_json::json!({"message": "from agent"})),
                (events::CONTROL_TAKEN, serde_json::json!({"value": true})),
                (
                    events::INTERLOCUTOR_REPLY,
                    serde_json::json!({"type": "text", "message": "other tab"}),
                ),
            ];
            // Another topic must not leak into the channel.
            send(
                &mut ws,
                Frame::new(
                    None,
                    None,
                    "interlocutor:someone-else",
                    events::AGENT_REPLY,
                    serde_json::json!({"message": "not for us"}),
                ),
            )
            .await;
            for (event, payload) in pushes {
                send(&mut ws, Frame::new(None, None, topic, event, payload)).await;
            }

            let leave = next_frame(&mut ws).await;
            assert_eq!(leave.event(), events::LEAVE);
            reply(&mut ws, &leave, "ok", serde_json::json!({})).await;
            ws
        });

        let service = WebSocketService::new(options(url));
        service.connect().await.unwrap();
        assert_eq!(service.state(), ConnectionState::Open);

        let channel = service.interlocutor_channel(params());
        channel.join().await.unwrap();

        let mut events_stream = subscribe_all(channel.as_ref());
        channel
            .send_reply("bot-token", &InterlocutorReplyMessage::text("hello"))
            .await
            .unwrap();

        let mut received = Vec::new();
        while received.len() < 4 {
            let event = tokio::time::timeout(Duration::from_secs(5), events_stream.next())
                .await
                .unwrap()
                .unwrap();
            received.push(event);
        }

        let kinds: Vec<_> = received.iter().map(ChannelEvent::kind).collect();
        for kind in [
            EventKind::BotReply,
            EventKind::AgentReply,
            EventKind::ControlTaken,
            EventKind::InterlocutorReply,
        ] {
            assert_eq!(kinds.iter().filter(|k| **k == kind).count(), 1);
        }
        assert!(received.iter().all(|e| match e {
            ChannelEvent::AgentReply(m) => m.message == "from agent",
            _ => true,
        }));

        channel.leave().await.unwrap();
        let _server_ws = server.await.unwrap();
        service.disconnect().await;
        assert_eq!(service.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn rejected_join_is_an_error() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            let join = next_frame(&mut ws).await;
            reply(
                &mut ws,
                &join,
                "error",
                serde_json::json!({"reason": "unauthorized"}),
            )
            .await;
            ws
        });

        let service = WebSocketService::new(options(url));
        service.connect().await.unwrap();
        let channel = service.interlocutor_channel(params());
        let err = channel.join().await.unwrap_err();
        match err {
            ChannelError::JoinRejected { topic, reason } => {
                assert_eq!(topic, "interlocutor:int-1");
                assert!(reason.contains("unauthorized"));
            },
            other => panic!("unexpected error: {other}"),
        }
        let _server_ws = server.await.unwrap();
    }

    #[tokio::test]
    async fn server_close_fails_pending_join_and_closes_state() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            let _join = next_frame(&mut ws).await;
            ws.close(None).await.unwrap();
        });

        let service = WebSocketService::new(options(url));
        service.connect().await.unwrap();
        let mut states = service.connection_state();
        assert_eq!(states.next().await, Some(ConnectionState::Open));

        let channel = service.interlocutor_channel(params());
        let result = channel.join().await;
        assert!(matches!(result, Err(ChannelError::Closed)));
        server.await.unwrap();

        let closed = tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(state) = states.next().await {
                if state == ConnectionState::Closed {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap();
        assert!(closed);
    }

    #[tokio::test]
    async fn event_streams_end_when_socket_closes() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            let join = next_frame(&mut ws).await;
            reply(&mut ws, &join, "ok", serde_json::json!({})).await;
            let release = Frame::new(
                None,
                None,
                join.topic(),
                events::CONTROL_TAKEN,
                Value::Null,
            );
            send(&mut ws, release).await;
            ws.close(None).await.unwrap();
        });

        let service = WebSocketService::new(options(url));
        service.connect().await.unwrap();
        let channel = service.interlocutor_channel(params());
        channel.join().await.unwrap();
        let mut events_stream = subscribe_all(channel.as_ref());

        let first = tokio::time::timeout(Duration::from_secs(5), events_stream.next())
            .await
            .unwrap();
        match first {
            Some(ChannelEvent::ControlTaken(m)) => assert!(!m.value),
            other => panic!("unexpected event: {other:?}"),
        }
        let end = tokio::time::timeout(Duration::from_secs(5), events_stream.next())
            .await
            .unwrap();
        assert!(end.is_none());
        server.await.unwrap();
        assert_eq!(service.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn zero_heartbeat_interval_disables_heartbeat() {
        let (listener, url) = listen().await;
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            let ws = accept(&listener).await;
            let _ = done_rx.await;
            drop(ws);
        });

        let service = WebSocketService::new(SocketOptions {
            heartbeat_interval: Duration::ZERO,
            ..options(url)
        });
        service.connect().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        {
            let tasks = service.inner.tasks.lock().await;
            assert_eq!(tasks.len(), 2);
            assert!(tasks.iter().all(|task| !task.is_finished()));
        }
        assert_eq!(service.state(), ConnectionState::Open);

        service.disconnect().await;
        let _ = done_tx.send(());
        server.await.unwrap();
    }
}
