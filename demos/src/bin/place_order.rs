//! Demo 3: Place and Cancel a Limit Order
//!
//! Showcases: request signing, POST with query parameters, error taxonomy
//!
//! Places a far-from-market post-only buy on testnet and cancels it.
//!
//! Run: BYBIT_API_KEY=... BYBIT_API_SECRET=... cargo run --bin place_order

use bybit_sdk::prelude::*;
use colored::*;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  PLACE / CANCEL ROUND TRIP".cyan().bold());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let bybit = BybitBuilder::from_env()?.build()?;
    if bybit.network().is_mainnet() {
        println!("{} Refusing to run against mainnet", "✗".red());
        return Ok(());
    }

    // Local validation rejects this before anything is sent
    let missing_price = Params::new()
        .with("symbol", "BTCUSD")
        .with("side", Side::Buy)
        .with("order_type", OrderType::Limit)
        .with("qty", 1)
        .with("time_in_force", TimeInForce::GoodTillCancel);
    match bybit.place_active_order(missing_price).await {
        Err(e) => println!("{} Rejected locally: {}", "•".yellow(), e),
        Ok(_) => println!("{} Unexpectedly accepted", "✗".red()),
    }

    let order = OrderRequest::limit("BTCUSD", Side::Buy, 1, dec!(1000))
        .post_only()
        .with_order_link_id(format!("demo-{}", chrono::Utc::now().timestamp_millis()));

    let placed = match bybit.place_order(&order).await {
        Ok(response) => response,
        Err(e) => {
            println!("{} Place failed ({:?}): {}", "✗".red(), e.kind(), e);
            let strategy = e.recovery_strategy();
            if strategy.allows_retry() {
                println!("  retry hint: {:?}", strategy);
            }
            return Ok(());
        }
    };

    println!("{} Placed:\n{}", "✓".green(), serde_json::to_string_pretty(&placed)?);

    let Some(order_id) = placed["result"]["order_id"].as_str() else {
        println!(
            "{} No order id returned (ret_code {})",
            "✗".red(),
            placed["ret_code"]
        );
        return Ok(());
    };

    let cancelled = bybit
        .cancel_active_order(
            Params::new()
                .with("symbol", "BTCUSD")
                .with("order_id", order_id),
        )
        .await?;
    println!("{} Cancelled:\n{}", "✓".green(), serde_json::to_string_pretty(&cancelled)?);

    Ok(())
}
