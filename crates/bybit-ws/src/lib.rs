//! Realtime stream client for the Bybit API
//!
//! Connects to the network's `/realtime` socket, authenticates when
//! credentials are supplied, keeps the connection alive with `ping` frames
//! and forwards every frame as a [`StreamEvent`].
//!
//! # Example
//!
//! ```no_run
//! use bybit_ws::{BybitStream, StreamConfig, Topic};
//! use bybit_types::Network;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stream = std::sync::Arc::new(BybitStream::new(StreamConfig::for_network(Network::Testnet)));
//!     stream.subscribe([Topic::trade("BTCUSD")])?;
//!
//!     let mut events = stream.take_event_receiver().unwrap();
//!     let runner = stream.clone();
//!     tokio::spawn(async move { runner.connect_and_run().await });
//!
//!     while let Some(event) = events.recv().await {
//!         println!("{:?}", event);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod events;
pub mod stream;
pub mod topic;
pub mod transport;

pub use error::{StreamError, StreamResult};
pub use events::{DisconnectReason, StreamEvent};
pub use stream::{BybitStream, StreamConfig, StreamState};
pub use topic::{auth_frame, ping_frame, subscribe_frame, unsubscribe_frame, Topic};
pub use transport::{Transport, TransportError, TungsteniteTransport};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;
