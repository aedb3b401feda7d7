//! Socket abstraction under the stream loop
//!
//! [`Transport`] hides tokio-tungstenite so [`crate::BybitStream`] can be
//! driven by a scripted [`MockTransport`] in tests.
//!
//! ```no_run
//! use bybit_ws::transport::{TungsteniteTransport, Transport, TransportError};
//!
//! async fn ping_once() -> Result<(), TransportError> {
//!     let mut socket = TungsteniteTransport::new("wss://stream-testnet.bybit.com/realtime");
//!     socket.open().await?;
//!     socket.send_text(r#"{"op":"ping"}"#).await?;
//!     while let Some(frame) = socket.next_text().await? {
//!         println!("{}", frame);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, instrument, trace};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Socket level failures
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Handshake failed
    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// Handshake did not finish in time
    #[error("no handshake from {url} within {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// Peer went away without a close frame
    #[error("socket closed without close frame")]
    Closed,

    /// Operation on a socket that is not open
    #[error("socket is not open")]
    NotConnected,

    /// Read or write failed
    #[error("socket i/o failed: {0}")]
    Io(String),

    /// Binary frame that is not UTF-8
    #[error("binary frame is not UTF-8: {0}")]
    InvalidFrame(String),
}

/// A text-frame socket
#[async_trait]
pub trait Transport: Send {
    /// Perform the handshake
    async fn open(&mut self) -> Result<(), TransportError>;

    /// Write one text frame
    async fn send_text(&mut self, frame: &str) -> Result<(), TransportError>;

    /// Next text frame; `Ok(None)` once the peer sent a close frame
    async fn next_text(&mut self) -> Result<Option<String>, TransportError>;

    /// Send a close frame and drop the socket
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Whether the handshake completed and the socket was not closed since
    fn is_open(&self) -> bool;

    /// Socket URL
    fn url(&self) -> &str;
}

/// [`Transport`] over tokio-tungstenite
pub struct TungsteniteTransport {
    url: String,
    handshake_timeout: Duration,
    socket: Option<Socket>,
}

impl TungsteniteTransport {
    /// Unopened transport for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            handshake_timeout: Duration::from_secs(10),
            socket: None,
        }
    }

    /// Bound the handshake duration
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    fn socket(&mut self) -> Result<&mut Socket, TransportError> {
        self.socket.as_mut().ok_or(TransportError::NotConnected)
    }
}

#[async_trait]
impl Transport for TungsteniteTransport {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn open(&mut self) -> Result<(), TransportError> {
        let handshake = tokio::time::timeout(self.handshake_timeout, connect_async(&self.url));
        let (socket, response) = match handshake.await {
            Ok(Ok(connected)) => connected,
            Ok(Err(e)) => {
                return Err(TransportError::Connect {
                    url: self.url.clone(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(TransportError::Timeout {
                    url: self.url.clone(),
                    timeout: self.handshake_timeout,
                })
            }
        };

        debug!(status = %response.status(), "Handshake complete");
        self.socket = Some(socket);
        Ok(())
    }

    async fn send_text(&mut self, frame: &str) -> Result<(), TransportError> {
        trace!(frame, "Sending frame");
        self.socket()?
            .send(Message::Text(frame.to_owned()))
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    async fn next_text(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            let Some(message) = self.socket()?.next().await else {
                self.socket = None;
                return Err(TransportError::Closed);
            };

            match message.map_err(|e| TransportError::Io(e.to_string()))? {
                Message::Text(text) => return Ok(Some(text)),
                Message::Binary(bytes) => {
                    return String::from_utf8(bytes)
                        .map(Some)
                        .map_err(|e| TransportError::InvalidFrame(e.to_string()))
                }
                Message::Close(frame) => {
                    debug!(?frame, "Peer closed socket");
                    self.socket = None;
                    return Ok(None);
                }
                // control frames are answered by tungstenite
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self.socket.take() {
            Some(mut socket) => socket
                .close(None)
                .await
                .map_err(|e| TransportError::Io(e.to_string())),
            None => Ok(()),
        }
    }

    fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(any(test, feature = "test-utils"))]
enum Scripted {
    Text(String),
    Close,
    Fail(TransportError),
}

/// Scripted [`Transport`] for tests
///
/// Replays the scripted frames in order and records every frame sent. When
/// the script runs out the socket reports [`TransportError::Closed`], or
/// blocks forever if built with [`lingering`](Self::lingering).
#[cfg(any(test, feature = "test-utils"))]
pub struct MockTransport {
    url: String,
    open: bool,
    refuse: bool,
    linger: bool,
    script: std::collections::VecDeque<Scripted>,
    sent: Vec<String>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    /// Empty script
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            open: false,
            refuse: false,
            linger: false,
            script: Default::default(),
            sent: Vec::new(),
        }
    }

    /// Append an incoming text frame
    pub fn with_text(mut self, frame: impl Into<String>) -> Self {
        self.script.push_back(Scripted::Text(frame.into()));
        self
    }

    /// Append a close frame from the peer
    pub fn with_close(mut self) -> Self {
        self.script.push_back(Scripted::Close);
        self
    }

    /// Append a read failure
    pub fn with_failure(mut self, error: TransportError) -> Self {
        self.script.push_back(Scripted::Fail(error));
        self
    }

    /// Fail the handshake
    pub fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }

    /// Block instead of closing once the script is drained
    pub fn lingering(mut self) -> Self {
        self.linger = true;
        self
    }

    /// Frames written so far
    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl Transport for MockTransport {
    async fn open(&mut self) -> Result<(), TransportError> {
        if self.refuse {
            return Err(TransportError::Connect {
                url: self.url.clone(),
                reason: "refused by mock".into(),
            });
        }
        self.open = true;
        Ok(())
    }

    async fn send_text(&mut self, frame: &str) -> Result<(), TransportError> {
        if !self.open {
            return Err(TransportError::NotConnected);
        }
        self.sent.push(frame.to_owned());
        Ok(())
    }

    async fn next_text(&mut self) -> Result<Option<String>, TransportError> {
        if !self.open {
            return Err(TransportError::NotConnected);
        }
        match self.script.pop_front() {
            Some(Scripted::Text(text)) => Ok(Some(text)),
            Some(Scripted::Close) => {
                self.open = false;
                Ok(None)
            }
            Some(Scripted::Fail(error)) => Err(error),
            None if self.linger => std::future::pending().await,
            None => Err(TransportError::Closed),
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_script_in_order() {
        let mut socket = MockTransport::new("wss://mock.test")
            .with_text("first")
            .with_text("second")
            .with_close();

        socket.open().await.unwrap();
        assert_eq!(socket.next_text().await.unwrap().as_deref(), Some("first"));
        assert_eq!(socket.next_text().await.unwrap().as_deref(), Some("second"));
        assert_eq!(socket.next_text().await.unwrap(), None);
        assert!(!socket.is_open());
    }

    #[tokio::test]
    async fn test_mock_records_sent_frames() {
        let mut socket = MockTransport::new("wss://mock.test");
        assert!(matches!(
            socket.send_text("early").await,
            Err(TransportError::NotConnected)
        ));

        socket.open().await.unwrap();
        socket.send_text(r#"{"op":"ping"}"#).await.unwrap();
        assert_eq!(socket.sent(), [r#"{"op":"ping"}"#.to_string()]);
    }

    #[tokio::test]
    async fn test_mock_refusal_and_drained_script() {
        let mut refused = MockTransport::new("wss://mock.test").refusing();
        let err = refused.open().await.unwrap_err();
        assert!(err.to_string().contains("wss://mock.test"));

        let mut drained = MockTransport::new("wss://mock.test");
        drained.open().await.unwrap();
        assert!(matches!(drained.next_text().await, Err(TransportError::Closed)));
    }

    #[tokio::test]
    async fn test_lingering_mock_blocks() {
        let mut socket = MockTransport::new("wss://mock.test").lingering();
        socket.open().await.unwrap();

        let waited =
            tokio::time::timeout(Duration::from_millis(20), socket.next_text()).await;
        assert!(waited.is_err());
    }
}
