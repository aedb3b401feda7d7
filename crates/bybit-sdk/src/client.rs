//! High-level Bybit client

use crate::builder::{BybitBuilder, ConfigError};
use bybit_auth::Credentials;
use bybit_rest::BybitRestClient;
use bybit_types::Network;
use bybit_ws::{BybitStream, StreamConfig};
use std::ops::Deref;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Entry point for the Bybit REST API and realtime stream
///
/// Dereferences to [`BybitRestClient`], so every endpoint method is available
/// directly on this type. The stream is created on first use of
/// [`websocket`](Self::websocket).
///
/// # Example
///
/// ```no_run
/// use bybit_sdk::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let bybit = Bybit::new("api-key", "api-secret", false, 5000)?;
///
///     let funding = bybit
///         .get_funding_rate(Params::new().with("symbol", "BTCUSD"))
///         .await?;
///     println!("{}", funding);
///
///     Ok(())
/// }
/// ```
pub struct Bybit {
    rest: BybitRestClient,
    credentials: Credentials,
    stream_config: StreamConfig,
    stream: OnceLock<Arc<BybitStream>>,
}

impl Bybit {
    /// Create a client from key, secret, network flag and request timeout
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        mainnet: bool,
        timeout_ms: u64,
    ) -> Result<Self, ConfigError> {
        BybitBuilder::new()
            .api_key(api_key)
            .api_secret(api_secret)
            .mainnet(mainnet)
            .timeout_ms(timeout_ms)
            .build()
    }

    /// Create a client builder
    pub fn builder() -> BybitBuilder {
        BybitBuilder::new()
    }

    pub(crate) fn from_parts(
        rest: BybitRestClient,
        credentials: Credentials,
        stream_config: StreamConfig,
    ) -> Self {
        info!(network = %rest.config().network, "Bybit client ready");
        Self {
            rest,
            credentials,
            stream_config,
            stream: OnceLock::new(),
        }
    }

    /// The REST client
    pub fn rest(&self) -> &BybitRestClient {
        &self.rest
    }

    /// Selected network
    pub fn network(&self) -> Network {
        self.rest.config().network
    }

    /// REST base URL
    pub fn base_url(&self) -> &'static str {
        self.network().rest_url()
    }

    /// Stream URL
    pub fn ws_url(&self) -> &'static str {
        self.network().ws_url()
    }

    /// Authenticated stream for this network, created on first call
    ///
    /// The stream is not connected; spawn
    /// [`BybitStream::connect_and_run`] to start it.
    pub fn websocket(&self) -> Arc<BybitStream> {
        self.stream
            .get_or_init(|| {
                info!(url = %self.stream_config.url, "Creating stream");
                Arc::new(BybitStream::with_credentials(
                    self.stream_config.clone(),
                    self.credentials.clone(),
                ))
            })
            .clone()
    }
}

impl Deref for Bybit {
    type Target = BybitRestClient;

    fn deref(&self) -> &Self::Target {
        &self.rest
    }
}

impl std::fmt::Debug for Bybit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bybit")
            .field("rest", &self.rest)
            .field("stream_created", &self.stream.get().is_some())
            .finish()
    }
}
