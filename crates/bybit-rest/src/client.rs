//! Main REST client implementation

use bybit_auth::{Credentials, RequestSigner};
use bybit_types::{ApiResponse, Network, Params};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{RestError, RestResult};
use crate::operations::Operation;
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

/// Default request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default user agent
const DEFAULT_USER_AGENT: &str = concat!("bybit-rest/", env!("CARGO_PKG_VERSION"));

/// Bybit REST API client
///
/// Every call is validated, signed with a fresh timestamp and sent as a single
/// request. The client holds no mutable state and is cheap to clone.
///
/// # Example
///
/// ```no_run
/// use bybit_rest::{BybitRestClient, ClientConfig, Credentials, Params};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let creds = Credentials::from_env()?;
///     let client = BybitRestClient::new(creds, ClientConfig::default())?;
///
///     let leverage = client.get_leverage(Params::new()).await?;
///     println!("{}", leverage);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BybitRestClient {
    credentials: Credentials,
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
}

impl BybitRestClient {
    /// Create a client using the reqwest transport
    ///
    /// Fails only on misconfiguration (zero timeout, HTTP client setup).
    pub fn new(credentials: Credentials, config: ClientConfig) -> RestResult<Self> {
        config.validate()?;
        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let transport = ReqwestTransport::new(user_agent)?;

        info!(network = %config.network, timeout_ms = config.timeout_ms, "Created Bybit REST client");

        Ok(Self::with_transport(credentials, config, Arc::new(transport)))
    }

    /// Create a client over a custom transport
    pub fn with_transport(
        credentials: Credentials,
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            credentials,
            config,
            transport,
        }
    }

    /// REST base URL for the configured network
    pub fn base_url(&self) -> &'static str {
        self.config.network.rest_url()
    }

    /// Realtime stream URL for the configured network
    pub fn ws_url(&self) -> &'static str {
        self.config.network.ws_url()
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the credentials
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Validate, sign and send one operation
    ///
    /// Resolves with the raw JSON payload. Invalid parameters are rejected
    /// with [`RestError::InvalidField`] before anything is sent.
    #[instrument(skip_all, fields(operation = %operation))]
    pub async fn call(&self, operation: Operation, params: Params) -> RestResult<Value> {
        if let Err(source) = operation.schema().validate(&params) {
            warn!(field = %source.field(), error = %source, "Rejected invalid parameters");
            return Err(RestError::InvalidField {
                operation: operation.name(),
                source,
            });
        }

        let signed = RequestSigner::new(&self.credentials).sign(&params);
        let request = HttpRequest {
            method: operation.method(),
            url: format!("{}{}", self.base_url(), operation.path()),
            query: signed.into_params(),
            timeout: self.config.timeout(),
        };

        debug!(method = %request.method, url = %request.url, "Dispatching request");

        self.transport.send(request).await
    }

    /// Call an operation and decode the `result` of the response envelope
    ///
    /// A non-zero `ret_code` becomes [`RestError::Api`].
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        operation: Operation,
        params: Params,
    ) -> RestResult<T> {
        let payload = self.call(operation, params).await?;
        let response: ApiResponse<T> = ApiResponse::from_value(payload)
            .map_err(|e| RestError::Decode(format!("{}: {}", operation, e)))?;
        Ok(response.into_result()?)
    }
}

impl std::fmt::Debug for BybitRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BybitRestClient")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Network selector; fixes both REST and stream URLs
    pub network: Network,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the network
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Select mainnet (`true`) or testnet (`false`)
    pub fn with_mainnet(self, mainnet: bool) -> Self {
        self.with_network(Network::from_mainnet(mainnet))
    }

    /// Set timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject settings the client cannot run with
    pub fn validate(&self) -> RestResult<()> {
        if self.timeout_ms == 0 {
            return Err(RestError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
