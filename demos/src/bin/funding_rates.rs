//! Demo 1: Funding Rate Snapshot
//!
//! Showcases: signed GET requests, typed funding models
//!
//! Run: BYBIT_API_KEY=... BYBIT_API_SECRET=... cargo run --bin funding_rates

use bybit_sdk::prelude::*;
use colored::*;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

const SYMBOLS: [&str; 3] = ["BTCUSD", "ETHUSD", "XRPUSD"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(70).cyan());
    println!("{}", "  FUNDING RATE SNAPSHOT".cyan().bold());
    println!("{}", "  Bybit SDK Demo - Inverse Perpetual Funding".cyan());
    println!("{}", "═".repeat(70).cyan());
    println!();

    let bybit = BybitBuilder::from_env()?.build()?;
    println!("{} Using {} ({})\n", "✓".green(), bybit.network(), bybit.base_url());

    println!(
        "  {:<10} {:>14} {:>14} {:>12}",
        "SYMBOL".white().bold(),
        "LAST RATE".white().bold(),
        "PREDICTED".white().bold(),
        "ANNUAL".white().bold()
    );
    println!("  {}", "─".repeat(54));

    for symbol in SYMBOLS {
        let last = match bybit.funding_rate(symbol).await {
            Ok(rate) => rate,
            Err(e) => {
                println!("  {:<10} {}", symbol.cyan(), e.to_string().red());
                continue;
            }
        };

        let predicted = bybit
            .predicted_funding(symbol)
            .await
            .map(|p| format!("{:+.6}%", p.predicted_funding_rate * dec!(100)))
            .unwrap_or_else(|_| "-".to_string());

        // three settlements per day
        let annual = last.funding_rate * dec!(3) * dec!(365) * dec!(100);
        let rate_pct = format!("{:+.6}%", last.funding_rate * dec!(100));
        let rate_colored = if last.funding_rate > Decimal::ZERO {
            rate_pct.green()
        } else if last.funding_rate < Decimal::ZERO {
            rate_pct.red()
        } else {
            rate_pct.white()
        };

        println!(
            "  {:<10} {:>14} {:>14} {:>11.2}%",
            symbol.cyan(),
            rate_colored,
            predicted,
            annual
        );
    }

    println!();
    println!("  {} Positive rate = longs pay shorts", "•".green());
    println!("  {} Negative rate = shorts pay longs", "•".red());

    Ok(())
}
