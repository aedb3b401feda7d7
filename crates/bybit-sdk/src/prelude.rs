//! Re-exports for convenience
//!
//! ```
//! use bybit_sdk::prelude::*;
//! ```

pub use crate::builder::{BybitBuilder, ConfigError};
pub use crate::client::Bybit;

pub use bybit_auth::Credentials;

pub use bybit_rest::{
    ApiResponse, BybitRestClient, ClientConfig, ConditionalOrderRequest, ErrorKind, FundingRate,
    Kline, KlineRequest, Operation, OrderRequest, PredictedFunding, RestError, RestResult,
    SymbolInfo, ValidationError,
};

pub use bybit_types::{
    KlineInterval, Network, OrderStatus, OrderType, ParamValue, Params, RecoveryStrategy, Side,
    SortOrder, StopOrderStatus, TimeInForce, TriggerBy,
};

pub use bybit_ws::{BybitStream, DisconnectReason, StreamConfig, StreamEvent, Topic};

pub use rust_decimal::Decimal;
