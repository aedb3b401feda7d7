//! Error types for REST API operations

use bybit_auth::AuthError;
use bybit_types::error_codes::{BybitApiError, RecoveryStrategy};
use reqwest::header::HeaderMap;

use crate::schema::ValidationError;

/// Boxed error forwarded from the HTTP layer
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Request parameters failed the operation's schema; nothing was sent
    #[error("Invalid field for {operation}: {source}")]
    InvalidField {
        /// Operation name (e.g. `place_active_order`)
        operation: &'static str,
        /// What was wrong
        #[source]
        source: ValidationError,
    },

    /// Exchange responded with a non-success HTTP status
    #[error("Server error: HTTP {status}: {body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
        /// Response headers
        headers: HeaderMap,
        /// Error reported by the HTTP client, if any
        #[source]
        source: Option<BoxError>,
    },

    /// Request was sent but no response arrived (timeout, connection failure)
    #[error("Network error: {message}")]
    Network {
        /// Description of the failed request
        message: String,
        /// Original HTTP client error
        #[source]
        source: BoxError,
    },

    /// Request could not be built or sent
    #[error("Client error: {message}")]
    Client {
        /// Description of the failure
        message: String,
        /// Original HTTP client error
        #[source]
        source: BoxError,
    },

    /// Exchange accepted the HTTP request but answered with a non-zero `ret_code`
    #[error(transparent)]
    Api(#[from] BybitApiError),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Credential loading failed
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Response payload did not match the requested type
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Coarse error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Local validation failure
    InvalidField,
    /// Non-2xx HTTP response
    Server,
    /// No response received
    Network,
    /// Request never left the client
    Client,
    /// Non-zero `ret_code`
    Api,
    /// Misconfiguration
    Configuration,
    /// Credential problem
    Auth,
    /// Payload shape mismatch
    Decode,
}

impl RestError {
    /// Get the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidField { .. } => ErrorKind::InvalidField,
            Self::Server { .. } => ErrorKind::Server,
            Self::Network { .. } => ErrorKind::Network,
            Self::Client { .. } => ErrorKind::Client,
            Self::Api(_) => ErrorKind::Api,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Name of the offending field, for validation failures
    pub fn field(&self) -> Option<String> {
        match self {
            Self::InvalidField { source, .. } => Some(source.field()),
            _ => None,
        }
    }

    /// HTTP status, for server errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the recovery strategy for this error
    ///
    /// The client never retries on its own; this is a hint for callers.
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::Api(error) => error.recovery_strategy(),
            Self::Server { status: 429, .. } => RecoveryStrategy::rate_limit_backoff(),
            Self::Server { status, .. } if *status >= 500 => RecoveryStrategy::service_retry(),
            Self::Network { .. } => RecoveryStrategy::Retry {
                max_attempts: 3,
                delay_ms: 1000,
            },
            Self::Server { .. }
            | Self::InvalidField { .. }
            | Self::Client { .. }
            | Self::Configuration(_)
            | Self::Auth(_)
            | Self::Decode(_) => RecoveryStrategy::Fatal,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.recovery_strategy().allows_retry()
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Server { status: 429, .. })
            || matches!(self, Self::Api(error) if error.is_rate_limit())
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
