//! Parameter assembly for signed requests

use bybit_types::Params;
use tracing::{debug, warn};

use crate::canonical::{canonicalize, sorted};
use crate::credentials::Credentials;

/// Keys the signer owns; caller values for these are dropped
pub const RESERVED_KEYS: [&str; 3] = ["api_key", "timestamp", "sign"];

/// Request signer for building authenticated requests
///
/// One signer is created per call; the timestamp it carries is used both in
/// the signed message and in the outgoing parameter set.
#[derive(Debug)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    timestamp: i64,
}

impl<'a> RequestSigner<'a> {
    /// Create a signer stamped with the current time in milliseconds
    pub fn new(credentials: &'a Credentials) -> Self {
        Self::with_timestamp(credentials, chrono::Utc::now().timestamp_millis())
    }

    /// Create a signer with an explicit timestamp
    pub fn with_timestamp(credentials: &'a Credentials, timestamp: i64) -> Self {
        Self {
            credentials,
            timestamp,
        }
    }

    /// Get the timestamp for this request
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Sign `params` and assemble the outgoing set
    ///
    /// The result is `api_key`, the caller parameters sorted by name,
    /// `timestamp`, then `sign`.
    pub fn sign(&self, params: &Params) -> SignedRequest {
        let mut raw = params.clone();
        for key in RESERVED_KEYS {
            if raw.remove(key).is_some() {
                warn!(key, "Caller supplied a reserved parameter, overriding");
            }
        }

        let mut message_params = raw.clone();
        message_params.insert("api_key", self.api_key());
        message_params.insert("timestamp", self.timestamp);
        let message = canonicalize(&message_params);
        let signature = self.credentials.sign(&message);

        let mut pairs = Vec::with_capacity(raw.len() + RESERVED_KEYS.len());
        pairs.push(("api_key".to_string(), self.api_key().to_string()));
        pairs.extend(
            sorted(&raw)
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        pairs.push(("timestamp".to_string(), self.timestamp.to_string()));
        pairs.push(("sign".to_string(), signature.clone()));

        debug!(params = raw.len(), timestamp = self.timestamp, "Signed request");

        SignedRequest {
            params: pairs,
            message,
            timestamp: self.timestamp,
            signature,
        }
    }
}

/// The fully assembled parameter set for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    params: Vec<(String, String)>,
    message: String,
    timestamp: i64,
    signature: String,
}

impl SignedRequest {
    /// Outgoing parameters in wire order
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Consume into the outgoing parameters
    pub fn into_params(self) -> Vec<(String, String)> {
        self.params
    }

    /// Look up one outgoing parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The canonical message that was signed
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Timestamp used for this request
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Hex signature
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bybit_types::{OrderType, Side, TimeInForce};
    use std::collections::BTreeSet;

    const TS: i64 = 1542434791000;

    fn order_params() -> Params {
        Params::new()
            .with("symbol", "BTCUSD")
            .with("side", Side::Buy)
            .with("order_type", OrderType::Limit)
            .with("qty", 1)
            .with("price", 9000)
            .with("time_in_force", TimeInForce::GoodTillCancel)
    }

    #[test]
    fn test_signed_message_and_signature() {
        let creds = Credentials::new("test_key", "test_secret");
        let signed = RequestSigner::with_timestamp(&creds, TS).sign(&order_params());

        assert_eq!(
            signed.message(),
            "api_key=test_key&order_type=Limit&price=9000&qty=1&side=Buy\
             &symbol=BTCUSD&time_in_force=GoodTillCancel&timestamp=1542434791000"
        );
        assert_eq!(
            signed.signature(),
            "82b6a2e9770e2c20f009194a8509633dfb958a67d4c0801024524ebfd1363ef0"
        );
    }

    #[test]
    fn test_outgoing_order() {
        let creds = Credentials::new("test_key", "test_secret");
        let signed = RequestSigner::with_timestamp(&creds, TS).sign(&order_params());

        let keys: Vec<&str> = signed.params().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            [
                "api_key",
                "order_type",
                "price",
                "qty",
                "side",
                "symbol",
                "time_in_force",
                "timestamp",
                "sign"
            ]
        );
        assert_eq!(signed.get("sign"), Some(signed.signature()));
        assert_eq!(signed.get("timestamp"), Some("1542434791000"));
    }

    #[test]
    fn test_signed_set_completeness() {
        let creds = Credentials::new("key", "secret");
        let params = order_params();
        let signed = RequestSigner::new(&creds).sign(&params);

        let mut expected: BTreeSet<String> = params.keys().map(str::to_string).collect();
        expected.extend(RESERVED_KEYS.iter().map(|k| k.to_string()));
        let actual: BTreeSet<String> = signed.params().iter().map(|(k, _)| k.clone()).collect();

        assert_eq!(actual, expected);
        assert_eq!(signed.params().len(), params.len() + 3);
    }

    #[test]
    fn test_reserved_keys_overridden() {
        let creds = Credentials::new("real_key", "secret");
        let params = Params::new()
            .with("symbol", "BTCUSD")
            .with("api_key", "spoofed")
            .with("timestamp", 1)
            .with("sign", "deadbeef");

        let signed = RequestSigner::with_timestamp(&creds, TS).sign(&params);

        assert_eq!(signed.params().len(), 4);
        assert_eq!(signed.get("api_key"), Some("real_key"));
        assert_eq!(signed.get("timestamp"), Some("1542434791000"));
        assert_ne!(signed.get("sign"), Some("deadbeef"));
        assert_eq!(
            signed.message(),
            "api_key=real_key&symbol=BTCUSD&timestamp=1542434791000"
        );
    }

    #[test]
    fn test_empty_params() {
        let creds = Credentials::new("key", "secret");
        let signed = RequestSigner::with_timestamp(&creds, TS).sign(&Params::new());
        assert_eq!(signed.message(), "api_key=key&timestamp=1542434791000");
        assert_eq!(signed.params().len(), 3);
    }

    #[test]
    fn test_timestamp_is_current() {
        let creds = Credentials::new("key", "secret");
        let before = chrono::Utc::now().timestamp_millis();
        let signer = RequestSigner::new(&creds);
        let after = chrono::Utc::now().timestamp_millis();
        assert!(signer.timestamp() >= before && signer.timestamp() <= after);
    }
}
