//! Realtime stream connection
//!
//! One socket, one run loop. The loop authenticates (when credentials are
//! present), subscribes the registered topics, pings on a timer and forwards
//! every frame as a [`StreamEvent`]. It returns when the server closes the
//! socket, the transport fails or [`BybitStream::shutdown`] is called; it never
//! reconnects.

use crate::error::{StreamError, StreamResult};
use crate::events::{DisconnectReason, StreamEvent};
use crate::topic::{auth_frame, ping_frame, subscribe_frame, unsubscribe_frame, Topic};
use crate::transport::{Transport, TransportError, TungsteniteTransport};

use bybit_auth::Credentials;
use bybit_types::Network;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Stream connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    /// Not connected
    #[default]
    Disconnected,
    /// Connection in progress
    Connecting,
    /// Connected and ready
    Connected,
    /// Shutting down
    ShuttingDown,
}

/// Configuration for the stream
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Socket URL
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Interval between `ping` frames
    pub ping_interval: Duration,
    /// Validity window of the `auth` signature
    pub auth_expiry: Duration,
}

impl StreamConfig {
    /// Create a config for an explicit URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_secs(10),
            ping_interval: Duration::from_secs(30),
            auth_expiry: Duration::from_secs(10),
        }
    }

    /// Config pointing at the network's stream URL
    pub fn for_network(network: Network) -> Self {
        Self::new(network.ws_url())
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set ping interval
    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval;
        self
    }

    /// Set auth signature validity
    pub fn with_auth_expiry(mut self, expiry: Duration) -> Self {
        self.auth_expiry = expiry;
        self
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::for_network(Network::default())
    }
}

#[derive(Debug)]
enum Command {
    Subscribe(Vec<Topic>),
    Unsubscribe(Vec<Topic>),
    Shutdown,
}

enum Step {
    Frame(Result<Option<String>, TransportError>),
    Ping,
    Command(Option<Command>),
}

/// Realtime stream client
pub struct BybitStream {
    config: StreamConfig,
    credentials: Option<Credentials>,
    topics: RwLock<Vec<Topic>>,
    state: RwLock<StreamState>,
    running: AtomicBool,
    command_tx: mpsc::UnboundedSender<Command>,
    command_rx: Mutex<Option<mpsc::UnboundedReceiver<Command>>>,
    event_tx: mpsc::UnboundedSender<StreamEvent>,
    event_rx: RwLock<Option<mpsc::UnboundedReceiver<StreamEvent>>>,
}

impl BybitStream {
    /// Create a stream for public topics only
    pub fn new(config: StreamConfig) -> Self {
        Self::build(config, None)
    }

    /// Create a stream that authenticates on connect
    pub fn with_credentials(config: StreamConfig, credentials: Credentials) -> Self {
        Self::build(config, Some(credentials))
    }

    fn build(config: StreamConfig, credentials: Option<Credentials>) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            config,
            credentials,
            topics: RwLock::new(Vec::new()),
            state: RwLock::new(StreamState::Disconnected),
            running: AtomicBool::new(false),
            command_tx,
            command_rx: Mutex::new(Some(command_rx)),
            event_tx,
            event_rx: RwLock::new(Some(event_rx)),
        }
    }

    /// Stream configuration
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Get the current connection state
    pub fn state(&self) -> StreamState {
        *self.state.read()
    }

    /// Check if the run loop is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Check if this stream will authenticate
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Take the event receiver (can only be called once)
    pub fn take_event_receiver(&self) -> Option<mpsc::UnboundedReceiver<StreamEvent>> {
        self.event_rx.write().take()
    }

    /// Registered topics
    pub fn topics(&self) -> Vec<Topic> {
        self.topics.read().clone()
    }

    /// Register topics; sent immediately when the loop is running,
    /// otherwise on the next connect
    pub fn subscribe(&self, topics: impl IntoIterator<Item = Topic>) -> StreamResult<()> {
        let topics: Vec<Topic> = topics.into_iter().collect();

        if self.credentials.is_none() {
            if let Some(private) = topics.iter().find(|t| t.is_private()) {
                return Err(StreamError::AuthRequired(private.to_string()));
            }
        }

        let added: Vec<Topic> = {
            let mut registered = self.topics.write();
            let mut added = Vec::new();
            for topic in topics {
                if !registered.contains(&topic) {
                    registered.push(topic.clone());
                    added.push(topic);
                }
            }
            added
        };

        if !added.is_empty() && self.is_running() {
            let _ = self.command_tx.send(Command::Subscribe(added));
        }
        Ok(())
    }

    /// Drop topics from the registry and the live connection
    pub fn unsubscribe(&self, topics: impl IntoIterator<Item = Topic>) {
        let removed: Vec<Topic> = {
            let mut registered = self.topics.write();
            topics
                .into_iter()
                .filter(|topic| {
                    let before = registered.len();
                    registered.retain(|t| t != topic);
                    registered.len() != before
                })
                .collect()
        };

        if !removed.is_empty() && self.is_running() {
            let _ = self.command_tx.send(Command::Unsubscribe(removed));
        }
    }

    /// Ask the run loop to close the socket and return
    pub fn shutdown(&self) {
        if self.is_running() {
            *self.state.write() = StreamState::ShuttingDown;
            let _ = self.command_tx.send(Command::Shutdown);
        }
    }

    /// Connect to the configured URL and run until closed
    pub async fn connect_and_run(&self) -> StreamResult<()> {
        let mut transport = TungsteniteTransport::new(self.config.url.clone())
            .with_handshake_timeout(self.config.connect_timeout);
        self.run_with_transport(&mut transport).await
    }

    /// Run the loop over any transport
    pub async fn run_with_transport<T>(&self, transport: &mut T) -> StreamResult<()>
    where
        T: Transport + ?Sized,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(StreamError::AlreadyRunning);
        }

        let Some(mut commands) = self.command_rx.lock().take() else {
            self.running.store(false, Ordering::SeqCst);
            return Err(StreamError::AlreadyRunning);
        };

        // commands queued for a previous run are stale
        while commands.try_recv().is_ok() {}

        let result = self.drive(transport, &mut commands).await;

        *self.command_rx.lock() = Some(commands);
        *self.state.write() = StreamState::Disconnected;
        self.running.store(false, Ordering::SeqCst);
        result
    }

    #[instrument(skip_all, fields(url = %transport.url()))]
    async fn drive<T>(
        &self,
        transport: &mut T,
        commands: &mut mpsc::UnboundedReceiver<Command>,
    ) -> StreamResult<()>
    where
        T: Transport + ?Sized,
    {
        *self.state.write() = StreamState::Connecting;
        info!("Connecting to stream");

        transport.open().await.map_err(|e| self.fail(e))?;
        *self.state.write() = StreamState::Connected;
        self.emit(StreamEvent::Connected {
            url: transport.url().to_string(),
        });

        if let Some(credentials) = &self.credentials {
            let expires = chrono::Utc::now().timestamp_millis()
                + i64::try_from(self.config.auth_expiry.as_millis()).unwrap_or(i64::MAX / 2);
            debug!(expires, "Sending auth");
            transport
                .send_text(&auth_frame(&credentials.ws_auth(expires)))
                .await
                .map_err(|e| self.fail(e))?;
        }

        let topics = self.topics();
        if !topics.is_empty() {
            debug!(count = topics.len(), "Subscribing registered topics");
            transport
                .send_text(&subscribe_frame(&topics))
                .await
                .map_err(|e| self.fail(e))?;
        }

        let mut ping = tokio::time::interval(self.config.ping_interval);
        ping.tick().await;

        loop {
            let step = tokio::select! {
                frame = transport.next_text() => Step::Frame(frame),
                _ = ping.tick() => Step::Ping,
                command = commands.recv() => Step::Command(command),
            };

            match step {
                Step::Frame(Ok(Some(text))) => {
                    let event = StreamEvent::parse(&text);
                    if let StreamEvent::Authenticated { success: false, ret_msg } = &event {
                        warn!(%ret_msg, "Stream authentication rejected");
                    }
                    self.emit(event);
                }
                Step::Frame(Ok(None)) => {
                    info!("Server closed connection");
                    self.emit(StreamEvent::Disconnected {
                        reason: DisconnectReason::ServerClosed,
                    });
                    return Ok(());
                }
                Step::Frame(Err(e)) => return Err(self.fail(e)),
                Step::Ping => {
                    transport
                        .send_text(&ping_frame())
                        .await
                        .map_err(|e| self.fail(e))?;
                }
                Step::Command(Some(Command::Subscribe(topics))) => {
                    transport
                        .send_text(&subscribe_frame(&topics))
                        .await
                        .map_err(|e| self.fail(e))?;
                }
                Step::Command(Some(Command::Unsubscribe(topics))) => {
                    transport
                        .send_text(&unsubscribe_frame(&topics))
                        .await
                        .map_err(|e| self.fail(e))?;
                }
                Step::Command(Some(Command::Shutdown) | None) => {
                    info!("Shutdown requested, closing connection");
                    if let Err(e) = transport.close().await {
                        debug!(error = %e, "Close handshake failed");
                    }
                    self.emit(StreamEvent::Disconnected {
                        reason: DisconnectReason::Shutdown,
                    });
                    return Ok(());
                }
            }
        }
    }

    fn fail(&self, error: TransportError) -> StreamError {
        warn!(error = %error, "Stream transport error");
        self.emit(StreamEvent::Disconnected {
            reason: DisconnectReason::Error(error.to_string()),
        });
        StreamError::Transport(error)
    }

    fn emit(&self, event: StreamEvent) {
        let _ = self.event_tx.send(event);
    }
}

impl std::fmt::Debug for BybitStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BybitStream")
            .field("url", &self.config.url)
            .field("state", &self.state())
            .field("topics", &*self.topics.read())
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}
