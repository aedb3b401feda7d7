//! Shared types for the Bybit REST and realtime APIs
//!
//! This crate provides the core type definitions used across the workspace.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Network`] - Mainnet/testnet selector with the fixed REST and stream URLs
//! - [`Params`], [`ParamValue`] - Scalar request parameters
//! - [`Side`], [`OrderType`], [`TimeInForce`], [`TriggerBy`], [`KlineInterval`] - Request enums
//! - [`ApiResponse`] - The `ret_code`/`result` envelope every endpoint returns
//! - [`BybitApiError`], [`BybitErrorCode`] - Return code mapping with recovery hints

pub mod enums;
pub mod error_codes;
pub mod network;
pub mod params;
pub mod response;

// Re-export commonly used types
pub use enums::*;
pub use error_codes::*;
pub use network::*;
pub use params::*;
pub use response::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
