//! Stream topics and the outgoing control frames

use bybit_auth::WsAuth;
use bybit_types::KlineInterval;
use serde_json::json;
use std::fmt;

/// A realtime stream topic
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Top 25 levels of the order book, delta updates
    OrderBook25(String),
    /// Top 200 levels of the order book, pushed every 100ms
    OrderBook200(String),
    /// Public trades, for one symbol or all
    Trade(Option<String>),
    /// Insurance fund, for one currency or all
    Insurance(Option<String>),
    /// Instrument info, pushed every 100ms
    InstrumentInfo(String),
    /// Candlesticks
    Kline(String, KlineInterval),
    /// Own position updates (private)
    Position,
    /// Own executions (private)
    Execution,
    /// Own active orders (private)
    Order,
    /// Own conditional orders (private)
    StopOrder,
    /// Any other topic string, passed through verbatim
    Custom(String),
}

impl Topic {
    /// Order book top 25
    pub fn orderbook_25(symbol: impl Into<String>) -> Self {
        Self::OrderBook25(symbol.into())
    }

    /// Order book top 200
    pub fn orderbook_200(symbol: impl Into<String>) -> Self {
        Self::OrderBook200(symbol.into())
    }

    /// Trades for one symbol
    pub fn trade(symbol: impl Into<String>) -> Self {
        Self::Trade(Some(symbol.into()))
    }

    /// Instrument info for one symbol
    pub fn instrument_info(symbol: impl Into<String>) -> Self {
        Self::InstrumentInfo(symbol.into())
    }

    /// Candles for one symbol
    pub fn kline(symbol: impl Into<String>, interval: KlineInterval) -> Self {
        Self::Kline(symbol.into(), interval)
    }

    /// Private topics require an authenticated connection
    pub fn is_private(&self) -> bool {
        matches!(
            self,
            Self::Position | Self::Execution | Self::Order | Self::StopOrder
        )
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderBook25(symbol) => write!(f, "orderBookL2_25.{}", symbol),
            Self::OrderBook200(symbol) => write!(f, "orderBook_200.100ms.{}", symbol),
            Self::Trade(None) => f.write_str("trade"),
            Self::Trade(Some(symbol)) => write!(f, "trade.{}", symbol),
            Self::Insurance(None) => f.write_str("insurance"),
            Self::Insurance(Some(currency)) => write!(f, "insurance.{}", currency),
            Self::InstrumentInfo(symbol) => write!(f, "instrument_info.100ms.{}", symbol),
            Self::Kline(symbol, interval) => write!(f, "klineV2.{}.{}", interval, symbol),
            Self::Position => f.write_str("position"),
            Self::Execution => f.write_str("execution"),
            Self::Order => f.write_str("order"),
            Self::StopOrder => f.write_str("stop_order"),
            Self::Custom(topic) => f.write_str(topic),
        }
    }
}

/// `{"op":"subscribe","args":[...]}`
pub fn subscribe_frame(topics: &[Topic]) -> String {
    op_frame("subscribe", topics)
}

/// `{"op":"unsubscribe","args":[...]}`
pub fn unsubscribe_frame(topics: &[Topic]) -> String {
    op_frame("unsubscribe", topics)
}

/// `{"op":"auth","args":[api_key, expires, signature]}`
pub fn auth_frame(auth: &WsAuth) -> String {
    json!({"op": "auth", "args": auth.args()}).to_string()
}

/// `{"op":"ping"}`
pub fn ping_frame() -> String {
    json!({"op": "ping"}).to_string()
}

fn op_frame(op: &str, topics: &[Topic]) -> String {
    let args: Vec<String> = topics.iter().map(Topic::to_string).collect();
    json!({"op": op, "args": args}).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bybit_auth::Credentials;
    use serde_json::Value;

    #[test]
    fn test_topic_strings() {
        assert_eq!(Topic::orderbook_25("BTCUSD").to_string(), "orderBookL2_25.BTCUSD");
        assert_eq!(
            Topic::orderbook_200("BTCUSD").to_string(),
            "orderBook_200.100ms.BTCUSD"
        );
        assert_eq!(Topic::Trade(None).to_string(), "trade");
        assert_eq!(Topic::trade("ETHUSD").to_string(), "trade.ETHUSD");
        assert_eq!(Topic::Insurance(Some("BTC".into())).to_string(), "insurance.BTC");
        assert_eq!(
            Topic::instrument_info("BTCUSD").to_string(),
            "instrument_info.100ms.BTCUSD"
        );
        assert_eq!(
            Topic::kline("BTCUSD", KlineInterval::M1).to_string(),
            "klineV2.1.BTCUSD"
        );
        assert_eq!(Topic::StopOrder.to_string(), "stop_order");
    }

    #[test]
    fn test_private_topics() {
        assert!(Topic::Position.is_private());
        assert!(Topic::Order.is_private());
        assert!(!Topic::trade("BTCUSD").is_private());
        assert!(!Topic::Custom("position".into()).is_private());
    }

    #[test]
    fn test_frames() {
        let frame: Value =
            serde_json::from_str(&subscribe_frame(&[Topic::trade("BTCUSD"), Topic::Position]))
                .unwrap();
        assert_eq!(frame["op"], "subscribe");
        assert_eq!(frame["args"][0], "trade.BTCUSD");
        assert_eq!(frame["args"][1], "position");

        assert_eq!(ping_frame(), r#"{"op":"ping"}"#);

        let auth = Credentials::new("test_key", "test_secret").ws_auth(1_600_000_000_000);
        let frame: Value = serde_json::from_str(&auth_frame(&auth)).unwrap();
        assert_eq!(frame["op"], "auth");
        assert_eq!(frame["args"][0], "test_key");
        assert_eq!(frame["args"][1], "1600000000000");
        assert_eq!(frame["args"][2], auth.signature);
    }
}
