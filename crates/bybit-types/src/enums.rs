//! Side, OrderType, TimeInForce, TriggerBy, KlineInterval and status enums
//!
//! Every enum exposes `as_str()` with the exact wire spelling and a
//! `VARIANTS` table that request schemas use as the allowed domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl Side {
    /// Wire values accepted by the exchange
    pub const VARIANTS: &'static [&'static str] = &["Buy", "Sell"];

    /// Returns the side as used in API requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }

    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

/// Order types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Limit order - requires a price
    Limit,
    /// Market order - executes immediately at best available price
    Market,
}

impl OrderType {
    /// Wire values accepted by the exchange
    pub const VARIANTS: &'static [&'static str] = &["Limit", "Market"];

    /// Returns the order type as used in API requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "Limit",
            Self::Market => "Market",
        }
    }
}

/// Time in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeInForce {
    /// Good till cancelled
    #[default]
    GoodTillCancel,
    /// Immediate or cancel
    ImmediateOrCancel,
    /// Fill or kill
    FillOrKill,
    /// Maker only
    PostOnly,
}

impl TimeInForce {
    /// Wire values accepted by the exchange
    pub const VARIANTS: &'static [&'static str] = &[
        "GoodTillCancel",
        "ImmediateOrCancel",
        "FillOrKill",
        "PostOnly",
    ];

    /// Returns the time in force as used in API requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoodTillCancel => "GoodTillCancel",
            Self::ImmediateOrCancel => "ImmediateOrCancel",
            Self::FillOrKill => "FillOrKill",
            Self::PostOnly => "PostOnly",
        }
    }
}

/// Price source that triggers a conditional order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TriggerBy {
    /// Last traded price
    #[default]
    LastPrice,
    /// Index price
    IndexPrice,
    /// Mark price
    MarkPrice,
}

impl TriggerBy {
    /// Wire values accepted by the exchange
    pub const VARIANTS: &'static [&'static str] = &["LastPrice", "IndexPrice", "MarkPrice"];

    /// Returns the trigger source as used in API requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastPrice => "LastPrice",
            Self::IndexPrice => "IndexPrice",
            Self::MarkPrice => "MarkPrice",
        }
    }
}

/// Kline (candlestick) interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    /// 1 minute
    #[serde(rename = "1")]
    M1,
    /// 3 minutes
    #[serde(rename = "3")]
    M3,
    /// 5 minutes
    #[serde(rename = "5")]
    M5,
    /// 15 minutes
    #[serde(rename = "15")]
    M15,
    /// 30 minutes
    #[serde(rename = "30")]
    M30,
    /// 1 hour
    #[serde(rename = "60")]
    H1,
    /// 2 hours
    #[serde(rename = "120")]
    H2,
    /// 4 hours
    #[serde(rename = "240")]
    H4,
    /// 6 hours
    #[serde(rename = "360")]
    H6,
    /// 12 hours
    #[serde(rename = "720")]
    H12,
    /// 1 day
    #[serde(rename = "D")]
    D1,
    /// 1 week
    #[serde(rename = "W")]
    W1,
    /// 1 month
    #[serde(rename = "M")]
    Month1,
}

impl KlineInterval {
    /// Wire values accepted by the exchange
    pub const VARIANTS: &'static [&'static str] = &[
        "1", "3", "5", "15", "30", "60", "120", "240", "360", "720", "D", "W", "M",
    ];

    /// Returns the interval as used in API requests and stream topics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M1 => "1",
            Self::M3 => "3",
            Self::M5 => "5",
            Self::M15 => "15",
            Self::M30 => "30",
            Self::H1 => "60",
            Self::H2 => "120",
            Self::H4 => "240",
            Self::H6 => "360",
            Self::H12 => "720",
            Self::D1 => "D",
            Self::W1 => "W",
            Self::Month1 => "M",
        }
    }

    /// Interval length in seconds (months count as 30 days)
    pub fn as_secs(&self) -> u64 {
        match self {
            Self::M1 => 60,
            Self::M3 => 180,
            Self::M5 => 300,
            Self::M15 => 900,
            Self::M30 => 1_800,
            Self::H1 => 3_600,
            Self::H2 => 7_200,
            Self::H4 => 14_400,
            Self::H6 => 21_600,
            Self::H12 => 43_200,
            Self::D1 => 86_400,
            Self::W1 => 604_800,
            Self::Month1 => 2_592_000,
        }
    }
}

/// Active order status, used as a list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted by the matching engine
    Created,
    /// Rejected
    Rejected,
    /// Resting on the book
    New,
    /// Partially filled
    PartiallyFilled,
    /// Fully filled
    Filled,
    /// Cancelled
    Cancelled,
    /// Cancel in progress
    PendingCancel,
}

impl OrderStatus {
    /// Wire values accepted by the exchange
    pub const VARIANTS: &'static [&'static str] = &[
        "Created",
        "Rejected",
        "New",
        "PartiallyFilled",
        "Filled",
        "Cancelled",
        "PendingCancel",
    ];

    /// Returns the status as used in API requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Rejected => "Rejected",
            Self::New => "New",
            Self::PartiallyFilled => "PartiallyFilled",
            Self::Filled => "Filled",
            Self::Cancelled => "Cancelled",
            Self::PendingCancel => "PendingCancel",
        }
    }
}

/// Conditional order status, used as a list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopOrderStatus {
    /// Waiting for the trigger price
    Untriggered,
    /// Triggered and converted to an active order
    Triggered,
    /// Active
    Active,
    /// Cancelled
    Cancelled,
    /// Rejected
    Rejected,
    /// Deactivated
    Deactivated,
}

impl StopOrderStatus {
    /// Wire values accepted by the exchange
    pub const VARIANTS: &'static [&'static str] = &[
        "Untriggered",
        "Triggered",
        "Active",
        "Cancelled",
        "Rejected",
        "Deactivated",
    ];

    /// Returns the status as used in API requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Untriggered => "Untriggered",
            Self::Triggered => "Triggered",
            Self::Active => "Active",
            Self::Cancelled => "Cancelled",
            Self::Rejected => "Rejected",
            Self::Deactivated => "Deactivated",
        }
    }
}

/// Sort direction for paged list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first
    #[default]
    Desc,
    /// Oldest first
    Asc,
}

impl SortOrder {
    /// Wire values accepted by the exchange
    pub const VARIANTS: &'static [&'static str] = &["desc", "asc"];

    /// Returns the direction as used in API requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desc => "desc",
            Self::Asc => "asc",
        }
    }
}

macro_rules! impl_display_via_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

impl_display_via_as_str!(
    Side,
    OrderType,
    TimeInForce,
    TriggerBy,
    KlineInterval,
    OrderStatus,
    StopOrderStatus,
    SortOrder,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_serde() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"Buy\"");

        let parsed: Side = serde_json::from_str("\"Sell\"").unwrap();
        assert_eq!(parsed, Side::Sell);
        assert_eq!(parsed.opposite(), Side::Buy);
    }

    #[test]
    fn test_kline_interval_serde() {
        assert_eq!(serde_json::to_string(&KlineInterval::H4).unwrap(), "\"240\"");

        let parsed: KlineInterval = serde_json::from_str("\"D\"").unwrap();
        assert_eq!(parsed, KlineInterval::D1);
        assert_eq!(parsed.as_secs(), 86_400);
    }

    #[test]
    fn test_variants_match_as_str() {
        let sides = [Side::Buy, Side::Sell];
        assert!(sides.iter().all(|s| Side::VARIANTS.contains(&s.as_str())));

        let tifs = [
            TimeInForce::GoodTillCancel,
            TimeInForce::ImmediateOrCancel,
            TimeInForce::FillOrKill,
            TimeInForce::PostOnly,
        ];
        assert!(tifs.iter().all(|t| TimeInForce::VARIANTS.contains(&t.as_str())));
        assert_eq!(KlineInterval::VARIANTS.len(), 13);
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderType::Limit.to_string(), "Limit");
        assert_eq!(TriggerBy::MarkPrice.to_string(), "MarkPrice");
        assert_eq!(SortOrder::default().to_string(), "desc");
    }
}
