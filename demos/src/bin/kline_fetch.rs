//! Demo 2: Candlestick Fetch
//!
//! Showcases: typed request builder, typed kline decoding
//!
//! Run: BYBIT_API_KEY=... BYBIT_API_SECRET=... cargo run --bin kline_fetch [SYMBOL]

use bybit_sdk::prelude::*;
use colored::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "BTCUSD".to_string());

    println!("{}", "═".repeat(70).cyan());
    println!("{}", format!("  LAST 24 HOURLY CANDLES: {}", symbol).cyan().bold());
    println!("{}", "═".repeat(70).cyan());
    println!();

    let bybit = BybitBuilder::from_env()?.build()?;

    let now = chrono::Utc::now().timestamp();
    let request = KlineRequest::last(symbol.as_str(), KlineInterval::H1, 24, now);
    let candles = bybit.klines(&request).await?;

    println!(
        "  {:<20} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "OPEN TIME".white().bold(),
        "OPEN".white().bold(),
        "HIGH".white().bold(),
        "LOW".white().bold(),
        "CLOSE".white().bold(),
        "VOLUME".white().bold()
    );
    println!("  {}", "─".repeat(78));

    for candle in &candles {
        let time = chrono::DateTime::from_timestamp(candle.open_time, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| candle.open_time.to_string());
        let close = if candle.is_bullish() {
            candle.close.to_string().green()
        } else {
            candle.close.to_string().red()
        };

        println!(
            "  {:<20} {:>10} {:>10} {:>10} {:>10} {:>12}",
            time, candle.open, candle.high, candle.low, close, candle.volume
        );
    }

    if let (Some(first), Some(last)) = (candles.first(), candles.last()) {
        let change = last.close - first.open;
        println!();
        println!("  {} Net change over window: {}", "•".white(), change);
    }

    Ok(())
}
