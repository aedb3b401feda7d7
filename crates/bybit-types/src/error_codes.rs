//! Bybit return code mapping with recovery strategies
//!
//! Bybit answers most business failures with HTTP 200 and a non-zero
//! `ret_code`. This module maps the well-known codes to a structured error so
//! callers can decide how to react. The client itself never retries.

use std::fmt;
use std::time::Duration;

/// Recovery strategy for handling API errors
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecoveryStrategy {
    /// Exponential backoff before retry
    Backoff {
        initial_ms: u64,
        max_ms: u64,
        multiplier: u32,
    },
    /// Fixed delay retry
    Retry { delay_ms: u64, max_attempts: u32 },
    /// Local clock drifted outside the exchange's receive window
    ResyncClock,
    /// Cannot recover programmatically
    Fatal,
    /// Requires user intervention (e.g., add margin)
    UserAction { message: &'static str },
    /// Manual investigation needed
    #[default]
    Manual,
}

impl RecoveryStrategy {
    /// Default exponential backoff for rate limits
    pub fn rate_limit_backoff() -> Self {
        Self::Backoff {
            initial_ms: 1000,
            max_ms: 60000,
            multiplier: 2,
        }
    }

    /// Default retry for transient service errors
    pub fn service_retry() -> Self {
        Self::Retry {
            delay_ms: 1000,
            max_attempts: 3,
        }
    }

    /// Get the initial delay duration
    pub fn initial_delay(&self) -> Option<Duration> {
        match self {
            Self::Backoff { initial_ms, .. } => Some(Duration::from_millis(*initial_ms)),
            Self::Retry { delay_ms, .. } => Some(Duration::from_millis(*delay_ms)),
            _ => None,
        }
    }

    /// Check if this strategy allows retry
    pub fn allows_retry(&self) -> bool {
        matches!(
            self,
            Self::Backoff { .. } | Self::Retry { .. } | Self::ResyncClock
        )
    }
}

/// Well-known Bybit return codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BybitErrorCode {
    /// 10001: request parameter error
    ParamsError,
    /// 10002: timestamp outside the receive window
    RequestExpired,
    /// 10003: API key invalid
    InvalidApiKey,
    /// 10004: signature mismatch
    InvalidSign,
    /// 10005: key lacks permission for this endpoint
    PermissionDenied,
    /// 10006: too many visits
    TooManyVisits,
    /// 10007: backend response timeout
    BackendTimeout,
    /// 10010: request IP not bound to the key
    UnmatchedIp,
    /// 10016: internal service error
    ServiceError,
    /// 10017: path not found or method invalid
    RouteNotFound,
    /// 10018: IP rate limit exceeded
    IpRateLimit,
    /// 20001: order does not exist or is too late to cancel
    OrderNotExists,
    /// 30031: insufficient available balance
    InsufficientBalance,
}

impl BybitErrorCode {
    /// Map a numeric `ret_code` to a known code
    pub fn from_code(code: i64) -> Option<Self> {
        let parsed = match code {
            10001 => Self::ParamsError,
            10002 => Self::RequestExpired,
            10003 => Self::InvalidApiKey,
            10004 => Self::InvalidSign,
            10005 => Self::PermissionDenied,
            10006 => Self::TooManyVisits,
            10007 => Self::BackendTimeout,
            10010 => Self::UnmatchedIp,
            10016 => Self::ServiceError,
            10017 => Self::RouteNotFound,
            10018 => Self::IpRateLimit,
            20001 => Self::OrderNotExists,
            30031 => Self::InsufficientBalance,
            _ => return None,
        };
        Some(parsed)
    }

    /// The numeric `ret_code`
    pub fn code(&self) -> i64 {
        match self {
            Self::ParamsError => 10001,
            Self::RequestExpired => 10002,
            Self::InvalidApiKey => 10003,
            Self::InvalidSign => 10004,
            Self::PermissionDenied => 10005,
            Self::TooManyVisits => 10006,
            Self::BackendTimeout => 10007,
            Self::UnmatchedIp => 10010,
            Self::ServiceError => 10016,
            Self::RouteNotFound => 10017,
            Self::IpRateLimit => 10018,
            Self::OrderNotExists => 20001,
            Self::InsufficientBalance => 30031,
        }
    }

    /// Short human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::ParamsError => "request parameter error",
            Self::RequestExpired => "timestamp outside the receive window",
            Self::InvalidApiKey => "invalid API key",
            Self::InvalidSign => "invalid signature",
            Self::PermissionDenied => "permission denied for this API key",
            Self::TooManyVisits => "too many visits",
            Self::BackendTimeout => "backend response timeout",
            Self::UnmatchedIp => "request IP not bound to this API key",
            Self::ServiceError => "internal service error",
            Self::RouteNotFound => "request path not found or method invalid",
            Self::IpRateLimit => "IP rate limit exceeded",
            Self::OrderNotExists => "order does not exist or is too late to cancel",
            Self::InsufficientBalance => "insufficient available balance",
        }
    }

    /// Recovery strategy for this code
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::TooManyVisits | Self::IpRateLimit => RecoveryStrategy::rate_limit_backoff(),
            Self::BackendTimeout | Self::ServiceError => RecoveryStrategy::service_retry(),
            Self::RequestExpired => RecoveryStrategy::ResyncClock,
            Self::InvalidApiKey
            | Self::InvalidSign
            | Self::PermissionDenied
            | Self::UnmatchedIp
            | Self::RouteNotFound
            | Self::ParamsError => RecoveryStrategy::Fatal,
            Self::InsufficientBalance => RecoveryStrategy::UserAction {
                message: "add margin or reduce order size",
            },
            Self::OrderNotExists => RecoveryStrategy::Manual,
        }
    }

    /// True for rate-limit codes
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::TooManyVisits | Self::IpRateLimit)
    }

    /// True for credential or signature failures
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidApiKey | Self::InvalidSign | Self::PermissionDenied | Self::UnmatchedIp
        )
    }
}

impl fmt::Display for BybitErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

/// A non-zero `ret_code` answer from the exchange
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Bybit API error {ret_code}: {message}")]
pub struct BybitApiError {
    /// Raw numeric code
    pub ret_code: i64,
    /// Parsed code (if recognized)
    pub code: Option<BybitErrorCode>,
    /// `ret_msg` from the response
    pub message: String,
}

impl BybitApiError {
    /// Build from the envelope fields
    pub fn new(ret_code: i64, message: impl Into<String>) -> Self {
        Self {
            ret_code,
            code: BybitErrorCode::from_code(ret_code),
            message: message.into(),
        }
    }

    /// Get the recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        self.code
            .map(|c| c.recovery_strategy())
            .unwrap_or(RecoveryStrategy::Manual)
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.recovery_strategy().allows_retry()
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        self.code.map(|c| c.is_rate_limit()).unwrap_or(false)
    }
}
