//! High-level SDK for the Bybit inverse perpetual API
//!
//! [`Bybit`] bundles the signed REST client and a lazily created realtime
//! stream behind one constructor.
//!
//! # Quick Start
//!
//! ```no_run
//! use bybit_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bybit = BybitBuilder::from_env()?.build()?;
//!
//!     let order = OrderRequest::limit("BTCUSD", Side::Buy, 1, Decimal::from(9000));
//!     let response = bybit.place_order(&order).await?;
//!     println!("{}", response);
//!
//!     let stream = bybit.websocket();
//!     stream.subscribe([Topic::trade("BTCUSD"), Topic::Order])?;
//!     let mut events = stream.take_event_receiver().unwrap();
//!     tokio::spawn(async move { stream.connect_and_run().await });
//!
//!     while let Some(event) = events.recv().await {
//!         println!("{:?}", event);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod client;
pub mod prelude;

pub use builder::{BybitBuilder, ConfigError};
pub use client::Bybit;

pub use bybit_rest::{RestError, RestResult};
pub use bybit_types::{Network, Params};
