//! API credentials for Bybit
//!
//! Implements HMAC-SHA256 signing as required by Bybit's private endpoints
//! and the realtime stream's `auth` operation.
//!
//! # Security
//!
//! The API secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "BYBIT_API_KEY";
/// Environment variable holding the API secret
pub const API_SECRET_ENV: &str = "BYBIT_API_SECRET";

/// Lowercase hex HMAC-SHA256 of `message` keyed by `secret`
///
/// An empty secret is passed to HMAC unchanged.
pub fn hmac_sha256_hex(secret: &[u8], message: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// API credentials for authenticated requests
///
/// The key is sent in clear with every request; the secret never leaves the
/// process and is only used as the signing key.
pub struct Credentials {
    api_key: String,
    api_secret: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key and secret
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Create credentials from environment variables
    ///
    /// Reads `BYBIT_API_KEY` and `BYBIT_API_SECRET` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        Self::from_env_vars(API_KEY_ENV, API_SECRET_ENV)
    }

    /// Create credentials from the named environment variables
    pub fn from_env_vars(key_var: &str, secret_var: &str) -> AuthResult<Self> {
        let api_key =
            std::env::var(key_var).map_err(|_| AuthError::EnvVarNotSet(key_var.to_string()))?;
        let api_secret = std::env::var(secret_var)
            .map_err(|_| AuthError::EnvVarNotSet(secret_var.to_string()))?;

        if api_key.trim().is_empty() {
            return Err(AuthError::InvalidCredentials(format!("{} is empty", key_var)));
        }

        Ok(Self::new(api_key, api_secret))
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a message with the API secret
    ///
    /// # Returns
    /// Lowercase hex HMAC-SHA256 digest
    pub fn sign(&self, message: &str) -> String {
        hmac_sha256_hex(self.api_secret.expose_secret().as_bytes(), message)
    }

    /// Build the realtime stream `auth` payload
    ///
    /// The stream expects `hex(HMAC_SHA256(secret, "GET/realtime" + expires))`
    /// where `expires` is a future unix time in milliseconds.
    pub fn ws_auth(&self, expires_ms: i64) -> WsAuth {
        let signature = self.sign(&format!("GET/realtime{}", expires_ms));
        WsAuth {
            api_key: self.api_key.clone(),
            expires: expires_ms,
            signature,
        }
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            api_secret: SecretString::from(self.api_secret.expose_secret().to_string()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "api_key",
                &format!("{}...", self.api_key.chars().take(6).collect::<String>()),
            )
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Signed payload for the realtime stream `auth` operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsAuth {
    /// API key
    pub api_key: String,
    /// Expiry in unix milliseconds
    pub expires: i64,
    /// Hex signature
    pub signature: String,
}

impl WsAuth {
    /// The three `args` of the auth frame: key, expiry, signature
    pub fn args(&self) -> [String; 3] {
        [
            self.api_key.clone(),
            self.expires.to_string(),
            self.signature.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_known_vector() {
        assert_eq!(
            hmac_sha256_hex(b"key", "The quick brown fox jumps over the lazy dog"),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_empty_secret_and_message() {
        assert_eq!(
            hmac_sha256_hex(b"", ""),
            "b613679a0814d9ec772f95d778c35fc5ff1697c493715653c6c712144292c5ad"
        );
    }

    #[test]
    fn test_one_char_change_changes_digest() {
        let creds = Credentials::new("key", "secret");
        let other = Credentials::new("key", "secreT");

        let base = creds.sign("symbol=BTCUSD&timestamp=1");
        assert_ne!(base, creds.sign("symbol=BTCUSD&timestamp=2"));
        assert_ne!(base, other.sign("symbol=BTCUSD&timestamp=1"));
        assert_eq!(base, creds.sign("symbol=BTCUSD&timestamp=1"));
    }

    #[test]
    fn test_signature_is_lowercase_hex() {
        let sig = Credentials::new("k", "s").sign("a=1");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("test_api_key", "very_secret_value");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("very_secret_value"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("test_a..."));
    }

    #[test]
    fn test_clone_keeps_secret() {
        let creds = Credentials::new("key", "secret");
        let cloned = creds.clone();
        assert_eq!(creds.sign("x=1"), cloned.sign("x=1"));
        assert_eq!(cloned.api_key(), "key");
    }

    #[test]
    fn test_ws_auth_payload() {
        let creds = Credentials::new("test_key", "test_secret");
        let auth = creds.ws_auth(1_600_000_000_000);

        assert_eq!(
            auth.signature,
            "b9c48116715e8fd686f5c5733e3f2e1fe88088923c481409499e35515adac417"
        );
        let [key, expires, sig] = auth.args();
        assert_eq!(key, "test_key");
        assert_eq!(expires, "1600000000000");
        assert_eq!(sig, auth.signature);
    }

    #[test]
    fn test_from_env_missing_var() {
        let err = Credentials::from_env_vars(
            "BYBIT_AUTH_TEST_UNSET_KEY",
            "BYBIT_AUTH_TEST_UNSET_SECRET",
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::EnvVarNotSet(ref v) if v == "BYBIT_AUTH_TEST_UNSET_KEY"));
    }

    #[test]
    fn test_from_env_vars() {
        std::env::set_var("BYBIT_AUTH_TEST_KEY", "env_key");
        std::env::set_var("BYBIT_AUTH_TEST_SECRET", "env_secret");

        let creds =
            Credentials::from_env_vars("BYBIT_AUTH_TEST_KEY", "BYBIT_AUTH_TEST_SECRET").unwrap();
        assert_eq!(creds.api_key(), "env_key");
        assert_eq!(creds.sign("a=1"), Credentials::new("k", "env_secret").sign("a=1"));
    }
}
