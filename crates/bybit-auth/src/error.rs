//! Credential loading errors

/// Failure to obtain usable API credentials
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Key or secret rejected before any request is signed
    #[error("invalid API credentials: {0}")]
    InvalidCredentials(String),

    /// Required variable missing from the environment
    #[error("{0} is not set")]
    EnvVarNotSet(String),
}

/// Result alias for credential loading
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_message_names_variable() {
        let err = AuthError::EnvVarNotSet("BYBIT_API_SECRET".to_string());
        assert_eq!(err.to_string(), "BYBIT_API_SECRET is not set");
    }
}
