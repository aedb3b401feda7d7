//! Typed request builders
//!
//! Each builder renders into [`Params`] accepted by the matching operation
//! schema, so typed and untyped callers go through the same validation.

use bybit_types::{KlineInterval, OrderType, Params, Side, TimeInForce, TriggerBy};
use rust_decimal::Decimal;

/// Active order request (`place_active_order`)
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Contract symbol (e.g. `BTCUSD`)
    pub symbol: String,
    /// Order side
    pub side: Side,
    /// Order type
    pub order_type: OrderType,
    /// Quantity in contracts
    pub qty: u32,
    /// Limit price
    pub price: Option<Decimal>,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Take profit price
    pub take_profit: Option<Decimal>,
    /// Stop loss price
    pub stop_loss: Option<Decimal>,
    /// Only reduce an existing position
    pub reduce_only: Option<bool>,
    /// Close the position when triggered
    pub close_on_trigger: Option<bool>,
    /// Caller-assigned order id
    pub order_link_id: Option<String>,
}

impl OrderRequest {
    /// Create a market order
    pub fn market(symbol: impl Into<String>, side: Side, qty: u32) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            qty,
            price: None,
            time_in_force: TimeInForce::ImmediateOrCancel,
            take_profit: None,
            stop_loss: None,
            reduce_only: None,
            close_on_trigger: None,
            order_link_id: None,
        }
    }

    /// Create a limit order
    pub fn limit(symbol: impl Into<String>, side: Side, qty: u32, price: Decimal) -> Self {
        Self {
            order_type: OrderType::Limit,
            price: Some(price),
            time_in_force: TimeInForce::GoodTillCancel,
            ..Self::market(symbol, side, qty)
        }
    }

    /// Set time in force
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Set as post-only (maker only)
    pub fn post_only(self) -> Self {
        self.with_time_in_force(TimeInForce::PostOnly)
    }

    /// Attach a take profit
    pub fn with_take_profit(mut self, price: Decimal) -> Self {
        self.take_profit = Some(price);
        self
    }

    /// Attach a stop loss
    pub fn with_stop_loss(mut self, price: Decimal) -> Self {
        self.stop_loss = Some(price);
        self
    }

    /// Only reduce an existing position
    pub fn reduce_only(mut self) -> Self {
        self.reduce_only = Some(true);
        self
    }

    /// Close the position when triggered
    pub fn close_on_trigger(mut self) -> Self {
        self.close_on_trigger = Some(true);
        self
    }

    /// Set a caller-assigned order id
    pub fn with_order_link_id(mut self, id: impl Into<String>) -> Self {
        self.order_link_id = Some(id.into());
        self
    }

    /// Render as request parameters
    pub fn to_params(&self) -> Params {
        Params::new()
            .with("symbol", &self.symbol)
            .with("side", self.side)
            .with("order_type", self.order_type)
            .with("qty", self.qty)
            .with("time_in_force", self.time_in_force)
            .with_opt("price", self.price)
            .with_opt("take_profit", self.take_profit)
            .with_opt("stop_loss", self.stop_loss)
            .with_opt("reduce_only", self.reduce_only)
            .with_opt("close_on_trigger", self.close_on_trigger)
            .with_opt("order_link_id", self.order_link_id.clone())
    }
}

/// Conditional (stop) order request (`place_conditional_order`)
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalOrderRequest {
    /// Contract symbol
    pub symbol: String,
    /// Order side
    pub side: Side,
    /// Order type once triggered
    pub order_type: OrderType,
    /// Quantity in contracts
    pub qty: u32,
    /// Limit price once triggered
    pub price: Option<Decimal>,
    /// Current market price, used to infer trigger direction
    pub base_price: Decimal,
    /// Trigger price
    pub stop_px: Decimal,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Price source for the trigger
    pub trigger_by: Option<TriggerBy>,
    /// Close the position when triggered
    pub close_on_trigger: Option<bool>,
    /// Caller-assigned order id
    pub order_link_id: Option<String>,
}

impl ConditionalOrderRequest {
    /// Stop-market order
    pub fn market(
        symbol: impl Into<String>,
        side: Side,
        qty: u32,
        base_price: Decimal,
        stop_px: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            qty,
            price: None,
            base_price,
            stop_px,
            time_in_force: TimeInForce::GoodTillCancel,
            trigger_by: None,
            close_on_trigger: None,
            order_link_id: None,
        }
    }

    /// Stop-limit order
    pub fn limit(
        symbol: impl Into<String>,
        side: Side,
        qty: u32,
        price: Decimal,
        base_price: Decimal,
        stop_px: Decimal,
    ) -> Self {
        Self {
            order_type: OrderType::Limit,
            price: Some(price),
            ..Self::market(symbol, side, qty, base_price, stop_px)
        }
    }

    /// Set time in force
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Set the trigger price source
    pub fn with_trigger_by(mut self, trigger_by: TriggerBy) -> Self {
        self.trigger_by = Some(trigger_by);
        self
    }

    /// Close the position when triggered
    pub fn close_on_trigger(mut self) -> Self {
        self.close_on_trigger = Some(true);
        self
    }

    /// Set a caller-assigned order id
    pub fn with_order_link_id(mut self, id: impl Into<String>) -> Self {
        self.order_link_id = Some(id.into());
        self
    }

    /// Render as request parameters
    pub fn to_params(&self) -> Params {
        Params::new()
            .with("symbol", &self.symbol)
            .with("side", self.side)
            .with("order_type", self.order_type)
            .with("qty", self.qty)
            .with("base_price", self.base_price)
            .with("stop_px", self.stop_px)
            .with("time_in_force", self.time_in_force)
            .with_opt("price", self.price)
            .with_opt("trigger_by", self.trigger_by)
            .with_opt("close_on_trigger", self.close_on_trigger)
            .with_opt("order_link_id", self.order_link_id.clone())
    }
}

/// Candlestick query (`get_kline`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineRequest {
    /// Contract symbol
    pub symbol: String,
    /// Candle interval
    pub interval: KlineInterval,
    /// Start time, unix seconds
    pub from: i64,
    /// Maximum candles (exchange caps at 200)
    pub limit: Option<u32>,
}

impl KlineRequest {
    /// Candles for `symbol` starting at `from` (unix seconds)
    pub fn new(symbol: impl Into<String>, interval: KlineInterval, from: i64) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            from,
            limit: None,
        }
    }

    /// The most recent `count` candles ending at `now` (unix seconds)
    pub fn last(symbol: impl Into<String>, interval: KlineInterval, count: u32, now: i64) -> Self {
        let span = interval.as_secs() as i64 * i64::from(count);
        Self::new(symbol, interval, now - span).with_limit(count)
    }

    /// Cap the number of candles
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render as request parameters
    pub fn to_params(&self) -> Params {
        Params::new()
            .with("symbol", &self.symbol)
            .with("interval", self.interval)
            .with("from", self.from)
            .with_opt("limit", self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::Operation;
    use bybit_types::ParamValue;
    use rust_decimal_macros::dec;

    #[test]
    fn test_limit_order_params_pass_schema() {
        let order = OrderRequest::limit("BTCUSD", Side::Buy, 1, dec!(9000))
            .with_order_link_id("my-order-1")
            .reduce_only();
        let params = order.to_params();

        assert_eq!(params.get("price"), Some(&ParamValue::Decimal(dec!(9000))));
        assert_eq!(params.get("reduce_only"), Some(&ParamValue::Bool(true)));
        assert!(Operation::PlaceActiveOrder.schema().validate(&params).is_ok());
    }

    #[test]
    fn test_market_order_params() {
        let params = OrderRequest::market("ETHUSD", Side::Sell, 10).to_params();
        assert!(!params.contains_key("price"));
        assert_eq!(
            params.get("time_in_force").and_then(ParamValue::as_str),
            Some("ImmediateOrCancel")
        );
        assert!(Operation::PlaceActiveOrder.schema().validate(&params).is_ok());
    }

    #[test]
    fn test_conditional_order_params_pass_schema() {
        let order = ConditionalOrderRequest::limit(
            "BTCUSD",
            Side::Sell,
            5,
            dec!(8500),
            dec!(9000),
            dec!(8600),
        )
        .with_trigger_by(TriggerBy::MarkPrice);
        let params = order.to_params();

        assert_eq!(
            params.get("trigger_by").and_then(ParamValue::as_str),
            Some("MarkPrice")
        );
        assert!(Operation::PlaceConditionalOrder.schema().validate(&params).is_ok());
    }

    #[test]
    fn test_kline_request() {
        let request = KlineRequest::last("BTCUSD", KlineInterval::H1, 24, 1_600_000_000);
        assert_eq!(request.from, 1_600_000_000 - 24 * 3600);
        assert_eq!(request.limit, Some(24));

        let params = request.to_params();
        assert_eq!(params.get("interval").and_then(ParamValue::as_str), Some("60"));
        assert!(Operation::GetKline.schema().validate(&params).is_ok());
    }
}
