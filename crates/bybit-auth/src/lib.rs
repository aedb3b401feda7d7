//! Credentials and request signing for the Bybit API
//!
//! Private Bybit endpoints authenticate every request with an HMAC-SHA256
//! signature over the sorted request parameters. This crate holds the
//! credentials and produces the signed parameter set; it performs no I/O.
//!
//! # Example
//!
//! ```
//! use bybit_auth::{Credentials, RequestSigner};
//! use bybit_types::Params;
//!
//! let creds = Credentials::new("my_key", "my_secret");
//! let params = Params::new().with("symbol", "BTCUSD").with("leverage", 20);
//!
//! let signed = RequestSigner::with_timestamp(&creds, 1542434791000).sign(&params);
//!
//! assert_eq!(signed.get("api_key"), Some("my_key"));
//! assert_eq!(signed.get("timestamp"), Some("1542434791000"));
//! assert_eq!(signed.signature().len(), 64);
//! ```

mod canonical;
mod credentials;
mod error;
mod signer;

pub use canonical::{canonicalize, sorted};
pub use credentials::{hmac_sha256_hex, Credentials, WsAuth, API_KEY_ENV, API_SECRET_ENV};
pub use error::{AuthError, AuthResult};
pub use signer::{RequestSigner, SignedRequest, RESERVED_KEYS};
