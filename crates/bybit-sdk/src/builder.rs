//! Client builder
//!
//! # Example
//!
//! ```
//! use bybit_sdk::BybitBuilder;
//!
//! let bybit = BybitBuilder::new()
//!     .api_key("my-key")
//!     .api_secret("my-secret")
//!     .timeout_ms(3000)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(bybit.rest().base_url(), "https://api-testnet.bybit.com");
//! ```

use crate::client::Bybit;
use bybit_auth::{AuthError, Credentials, API_KEY_ENV, API_SECRET_ENV};
use bybit_rest::{BybitRestClient, ClientConfig, HttpTransport, RestError, DEFAULT_TIMEOUT_MS};
use bybit_types::Network;
use bybit_ws::StreamConfig;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;

/// Selects mainnet when set to `true` or `1`
pub const MAINNET_ENV: &str = "BYBIT_MAINNET";
/// Request timeout in milliseconds
pub const TIMEOUT_ENV: &str = "BYBIT_TIMEOUT_MS";

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No API key given
    #[error("API key must not be empty")]
    MissingApiKey,

    /// Timeout of zero
    #[error("request timeout must be greater than zero")]
    InvalidTimeout,

    /// Environment variable present but unparseable
    #[error("invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    /// REST client could not be built
    #[error(transparent)]
    Rest(#[from] RestError),

    /// Credentials could not be loaded
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Builder for [`Bybit`]
///
/// An absent or empty secret is accepted and used as the HMAC key as is.
#[derive(Default)]
pub struct BybitBuilder {
    api_key: Option<String>,
    api_secret: Option<SecretString>,
    network: Network,
    timeout_ms: Option<u64>,
    user_agent: Option<String>,
    ping_interval: Option<Duration>,
}

impl BybitBuilder {
    /// Start from testnet defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from `BYBIT_API_KEY`, `BYBIT_API_SECRET`,
    /// `BYBIT_MAINNET` and `BYBIT_TIMEOUT_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key =
            lookup(API_KEY_ENV).ok_or_else(|| AuthError::EnvVarNotSet(API_KEY_ENV.into()))?;
        let api_secret =
            lookup(API_SECRET_ENV).ok_or_else(|| AuthError::EnvVarNotSet(API_SECRET_ENV.into()))?;

        let mut builder = Self::new().api_key(api_key).api_secret(api_secret);

        if let Some(value) = lookup(MAINNET_ENV) {
            builder = builder.mainnet(matches!(value.trim(), "true" | "1"));
        }

        if let Some(value) = lookup(TIMEOUT_ENV) {
            let timeout_ms = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: TIMEOUT_ENV,
                value: value.clone(),
            })?;
            builder = builder.timeout_ms(timeout_ms);
        }

        Ok(builder)
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API secret
    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(SecretString::from(secret.into()));
        self
    }

    /// Use mainnet (`true`) or testnet (`false`)
    pub fn mainnet(mut self, mainnet: bool) -> Self {
        self.network = Network::from_mainnet(mainnet);
        self
    }

    /// Set the network directly
    pub fn network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Per-request timeout in milliseconds (default 5000)
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Override the HTTP User-Agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Stream heartbeat interval (default 30s)
    pub fn ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = Some(interval);
        self
    }

    /// Validate and build the client
    pub fn build(self) -> Result<Bybit, ConfigError> {
        let (credentials, config, stream_config) = self.validate()?;
        let rest = BybitRestClient::new(credentials.clone(), config)?;
        Ok(Bybit::from_parts(rest, credentials, stream_config))
    }

    /// Build over a caller-supplied HTTP transport
    pub fn build_with_transport(
        self,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Bybit, ConfigError> {
        let (credentials, config, stream_config) = self.validate()?;
        let rest = BybitRestClient::with_transport(credentials.clone(), config, transport);
        Ok(Bybit::from_parts(rest, credentials, stream_config))
    }

    fn validate(self) -> Result<(Credentials, ClientConfig, StreamConfig), ConfigError> {
        let api_key = self.api_key.unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let timeout_ms = self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let mut config = ClientConfig::new()
            .with_network(self.network)
            .with_timeout_ms(timeout_ms);
        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }

        let mut stream_config = StreamConfig::for_network(self.network);
        if let Some(interval) = self.ping_interval {
            stream_config = stream_config.with_ping_interval(interval);
        }

        let api_secret = self
            .api_secret
            .as_ref()
            .map(|s| s.expose_secret())
            .unwrap_or_default();

        Ok((Credentials::new(api_key, api_secret), config, stream_config))
    }
}

impl Clone for BybitBuilder {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            api_secret: self
                .api_secret
                .as_ref()
                .map(|s| SecretString::from(s.expose_secret().to_string())),
            network: self.network,
            timeout_ms: self.timeout_ms,
            user_agent: self.user_agent.clone(),
            ping_interval: self.ping_interval,
        }
    }
}

impl std::fmt::Debug for BybitBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BybitBuilder")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field("network", &self.network)
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("ping_interval", &self.ping_interval)
            .finish()
    }
}
