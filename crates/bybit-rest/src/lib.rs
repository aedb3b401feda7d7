//! Signed REST API client for the Bybit exchange
//!
//! Every call runs the same pipeline: the operation's schema validates the
//! parameters, the parameters are canonicalized and signed with HMAC-SHA256,
//! and the signed set is sent as query parameters (POST included). The raw
//! JSON payload is returned untouched.
//!
//! # Features
//!
//! - **Orders**: Place, list and cancel active and conditional orders
//! - **Positions**: Leverage, position list, isolated margin
//! - **Funding**: Last, paid and predicted funding rates
//! - **Market**: Execution history, contract specs, candlesticks
//!
//! # Errors
//!
//! Failures are classified into [`RestError::InvalidField`] (rejected locally,
//! nothing sent), [`RestError::Server`] (non-2xx response),
//! [`RestError::Network`] (no response) and [`RestError::Client`] (request
//! never sent). The client does not retry; [`RestError::recovery_strategy`]
//! tells callers what a retry policy could do.
//!
//! # Example
//!
//! ```no_run
//! use bybit_rest::{BybitRestClient, ClientConfig, Credentials, OrderRequest, Side};
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::from_env()?;
//!     let client = BybitRestClient::new(creds, ClientConfig::default())?;
//!
//!     let order = OrderRequest::limit("BTCUSD", Side::Buy, 1, Decimal::from(9000));
//!     let response = client.place_order(&order).await?;
//!     println!("{}", response);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod operations;
pub mod requests;
pub mod schema;
pub mod transport;

// Re-export main types
pub use bybit_auth::Credentials;
pub use client::{BybitRestClient, ClientConfig, DEFAULT_TIMEOUT_MS};
pub use error::{BoxError, ErrorKind, RestError, RestResult};
pub use operations::Operation;
pub use schema::{Field, FieldType, Rule, Schema, ValidationError};
pub use transport::{HttpRequest, HttpTransport, Method, ReqwestTransport};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockHttpTransport;

pub use models::{
    FundingFee, FundingRate, Kline, LeverageFilter, LotSizeFilter, PredictedFunding, PriceFilter,
    SymbolInfo,
};
pub use requests::{ConditionalOrderRequest, KlineRequest, OrderRequest};

// Re-export the parameter and enum types used in signatures
pub use bybit_types::{
    ApiResponse, KlineInterval, Network, OrderType, ParamValue, Params, Side, TimeInForce,
    TriggerBy,
};
