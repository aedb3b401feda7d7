//! Canonical message construction
//!
//! The exchange recomputes the signature from the parameters it receives, so
//! the message must be rebuilt exactly the way it does: pairs sorted by name,
//! rendered as `name=value`, joined with `&`. Values are not escaped.

use bybit_types::{ParamValue, Params};

/// Parameters sorted by name (byte-wise)
pub fn sorted(params: &Params) -> Vec<(&str, &ParamValue)> {
    let mut pairs: Vec<_> = params.iter().collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
    pairs
}

/// Render parameters as the signable `a=1&b=2` string
pub fn canonicalize(params: &Params) -> String {
    sorted(params)
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty() {
        assert_eq!(canonicalize(&Params::new()), "");
    }

    #[test]
    fn test_sorted_by_key() {
        let params = Params::new()
            .with("symbol", "BTCUSD")
            .with("leverage", 20)
            .with("api_key", "abc");
        assert_eq!(canonicalize(&params), "api_key=abc&leverage=20&symbol=BTCUSD");
    }

    #[test]
    fn test_insertion_order_independent() {
        let a = Params::new()
            .with("side", "Buy")
            .with("qty", 1)
            .with("price", dec!(9000.5))
            .with("reduce_only", false);
        let b = Params::new()
            .with("reduce_only", false)
            .with("price", dec!(9000.5))
            .with("qty", 1)
            .with("side", "Buy");

        assert_eq!(canonicalize(&a), canonicalize(&b));
        assert_eq!(
            canonicalize(&a),
            "price=9000.5&qty=1&reduce_only=false&side=Buy"
        );
    }

    #[test]
    fn test_values_not_escaped() {
        let params = Params::new().with("order_link_id", "a=b&c");
        assert_eq!(canonicalize(&params), "order_link_id=a=b&c");
    }

    #[test]
    fn test_byte_wise_ordering() {
        // Uppercase sorts before lowercase, '_' (0x5f) before lowercase
        let params = Params::new().with("b", 1).with("B", 2).with("a_b", 3).with("ab", 4);
        assert_eq!(canonicalize(&params), "B=2&a_b=3&ab=4&b=1");
    }
}
