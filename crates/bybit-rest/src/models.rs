//! Typed response models
//!
//! Endpoint methods return the raw payload; these types decode its `result`
//! on demand through [`crate::BybitRestClient::call_as`].

use bybit_types::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contract specification (`get_symbols`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Symbol name
    pub name: String,
    /// Display alias
    #[serde(default)]
    pub alias: Option<String>,
    /// Trading status
    #[serde(default)]
    pub status: Option<String>,
    /// Base currency
    pub base_currency: String,
    /// Quote currency
    pub quote_currency: String,
    /// Price decimal places
    #[serde(default)]
    pub price_scale: Option<u32>,
    /// Taker fee rate
    #[serde(default)]
    pub taker_fee: Option<Decimal>,
    /// Maker fee rate
    #[serde(default)]
    pub maker_fee: Option<Decimal>,
    /// Leverage bounds
    #[serde(default)]
    pub leverage_filter: Option<LeverageFilter>,
    /// Price bounds
    #[serde(default)]
    pub price_filter: Option<PriceFilter>,
    /// Quantity bounds
    #[serde(default)]
    pub lot_size_filter: Option<LotSizeFilter>,
}

/// Leverage bounds for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageFilter {
    pub min_leverage: Decimal,
    pub max_leverage: Decimal,
    pub leverage_step: Decimal,
}

/// Price bounds for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFilter {
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub tick_size: Decimal,
}

/// Quantity bounds for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotSizeFilter {
    pub max_trading_qty: Decimal,
    pub min_trading_qty: Decimal,
    pub qty_step: Decimal,
}

/// One candle (`get_kline`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// Symbol
    pub symbol: String,
    /// Interval (`1`, `60`, `D`, ...)
    pub interval: String,
    /// Open time, unix seconds
    pub open_time: i64,
    /// Open price
    pub open: Decimal,
    /// High price
    pub high: Decimal,
    /// Low price
    pub low: Decimal,
    /// Close price
    pub close: Decimal,
    /// Volume in contracts
    pub volume: Decimal,
    /// Turnover in base currency
    #[serde(default)]
    pub turnover: Option<Decimal>,
}

impl Kline {
    /// Close minus open
    pub fn change(&self) -> Decimal {
        self.close - self.open
    }

    /// Check if the candle closed above its open
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// Last settled funding rate (`get_funding_rate`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRate {
    /// Symbol
    pub symbol: String,
    /// Funding rate
    pub funding_rate: Decimal,
    /// Settlement time, unix seconds
    pub funding_rate_timestamp: i64,
}

/// Last funding fee paid or received (`get_prev_funding_rate`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingFee {
    /// Symbol
    pub symbol: String,
    /// Position side at settlement
    pub side: Side,
    /// Position size
    pub size: Decimal,
    /// Funding rate applied
    pub funding_rate: Decimal,
    /// Fee charged (negative when received)
    pub exec_fee: Decimal,
    /// Settlement time, unix seconds
    pub exec_timestamp: i64,
}

/// Predicted next funding (`get_next_funding_rate`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedFunding {
    /// Predicted rate
    pub predicted_funding_rate: Decimal,
    /// Predicted fee for the current position
    pub predicted_funding_fee: Decimal,
}
