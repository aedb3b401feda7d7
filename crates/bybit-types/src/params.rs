//! Request parameters
//!
//! Every endpoint takes a flat map of scalar parameters. The map is unordered;
//! signing code is responsible for sorting it.

use crate::enums::{
    KlineInterval, OrderStatus, OrderType, Side, SortOrder, StopOrderStatus, TimeInForce, TriggerBy,
};
use rust_decimal::Decimal;
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;

/// A single scalar parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Text value
    Str(String),
    /// Whole number
    Int(i64),
    /// Decimal number (prices, margins)
    Decimal(Decimal),
    /// Floating point number
    Float(f64),
    /// Boolean flag, rendered as `true`/`false`
    Bool(bool),
}

impl ParamValue {
    /// Name of the value's kind, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Decimal(_) | Self::Float(_) => "number",
            Self::Bool(_) => "boolean",
        }
    }

    /// Returns the string value, if this is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// True for any finite numeric value
    pub fn is_number(&self) -> bool {
        match self {
            Self::Int(_) | Self::Decimal(_) => true,
            Self::Float(f) => f.is_finite(),
            _ => false,
        }
    }

    /// True for numeric values without a fractional part
    pub fn is_integer(&self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Decimal(d) => d.fract().is_zero(),
            Self::Float(f) => f.is_finite() && f.fract() == 0.0,
            _ => false,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Float(x) => write!(f, "{}", x),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )+
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_enum {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Str(value.as_str().to_string())
                }
            }
        )+
    };
}

impl_from_enum!(
    Side,
    OrderType,
    TimeInForce,
    TriggerBy,
    KlineInterval,
    OrderStatus,
    StopOrderStatus,
    SortOrder
);

/// Caller-supplied parameters for one request
///
/// # Example
///
/// ```
/// use bybit_types::{Params, Side};
///
/// let params = Params::new()
///     .with("symbol", "BTCUSD")
///     .with("side", Side::Buy)
///     .with("qty", 1);
///
/// assert_eq!(params.len(), 3);
/// assert_eq!(params.get("side").unwrap().to_string(), "Buy");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: HashMap<String, ParamValue>,
}

impl Params {
    /// Create an empty parameter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add an optional parameter; `None` leaves the map unchanged
    pub fn with_opt<V: Into<ParamValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Insert a parameter, returning the previous value for the key
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.values.insert(key.into(), value.into())
    }

    /// Remove a parameter
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.values.remove(key)
    }

    /// Get a parameter
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    /// Check if a parameter is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no parameters
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over parameters in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over parameter names in arbitrary order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Into<ParamValue>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = hash_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_value_display_matches_wire_format() {
        assert_eq!(ParamValue::from(9000).to_string(), "9000");
        assert_eq!(ParamValue::from(dec!(9000.5)).to_string(), "9000.5");
        assert_eq!(ParamValue::from(0.25).to_string(), "0.25");
        assert_eq!(ParamValue::from(true).to_string(), "true");
        assert_eq!(ParamValue::from("BTCUSD").to_string(), "BTCUSD");
        assert_eq!(ParamValue::from(TimeInForce::PostOnly).to_string(), "PostOnly");
    }

    #[test]
    fn test_integer_detection() {
        assert!(ParamValue::Int(3).is_integer());
        assert!(ParamValue::Decimal(dec!(3.0)).is_integer());
        assert!(ParamValue::Float(3.0).is_integer());
        assert!(!ParamValue::Decimal(dec!(3.5)).is_integer());
        assert!(!ParamValue::Float(f64::NAN).is_integer());
        assert!(!ParamValue::from("3").is_integer());
    }

    #[test]
    fn test_non_finite_floats_are_not_numbers() {
        assert!(ParamValue::Float(0.5).is_number());
        assert!(ParamValue::Decimal(dec!(0.5)).is_number());
        assert!(!ParamValue::Float(f64::NAN).is_number());
        assert!(!ParamValue::Float(f64::INFINITY).is_number());
        assert!(!ParamValue::Float(f64::NEG_INFINITY).is_number());
        assert!(!ParamValue::from("0.5").is_number());
    }

    #[test]
    fn test_with_opt_skips_none() {
        let params = Params::new()
            .with("symbol", "BTCUSD")
            .with_opt("price", None::<Decimal>)
            .with_opt("limit", Some(50));

        assert_eq!(params.len(), 2);
        assert!(!params.contains_key("price"));
        assert_eq!(params.get("limit"), Some(&ParamValue::Int(50)));
    }

    #[test]
    fn test_from_iterator() {
        let params: Params = [("symbol", "BTCUSD"), ("order", "desc")].into_iter().collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("order").and_then(ParamValue::as_str), Some("desc"));
    }
}
