//! Error types for the realtime stream

use crate::transport::TransportError;

/// Errors raised by [`crate::BybitStream`]
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Socket failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Private topic requested without credentials
    #[error("topic `{0}` requires credentials")]
    AuthRequired(String),

    /// `connect_and_run` called while the stream is already running
    #[error("stream is already running")]
    AlreadyRunning,
}

/// Result type for stream operations
pub type StreamResult<T> = Result<T, StreamError>;
