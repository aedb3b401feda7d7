//! Demo 4: Realtime Trade Stream
//!
//! Showcases: lazily created stream, topic subscription, event handling
//!
//! Run: BYBIT_API_KEY=... BYBIT_API_SECRET=... cargo run --bin trade_stream

use bybit_sdk::prelude::*;
use colored::*;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  LIVE TRADES".cyan().bold());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let bybit = BybitBuilder::from_env()?.build()?;
    let stream = bybit.websocket();
    stream.subscribe([Topic::trade("BTCUSD"), Topic::Position])?;

    let mut events = stream.take_event_receiver().expect("Events already taken");

    let runner = stream.clone();
    tokio::spawn(async move {
        if let Err(e) = runner.connect_and_run().await {
            eprintln!("Stream error: {}", e);
        }
    });

    let start = Instant::now();
    let mut trades = 0u64;

    while let Some(event) = events.recv().await {
        match &event {
            StreamEvent::Connected { url } => println!("{} Connected to {}", "✓".green(), url),
            StreamEvent::Authenticated { success: true, .. } => {
                println!("{} Authenticated", "✓".green())
            }
            StreamEvent::Authenticated { ret_msg, .. } => {
                println!("{} Auth rejected: {}", "✗".red(), ret_msg)
            }
            StreamEvent::Message { topic, .. } if topic.starts_with("trade.") => {
                for trade in event.data().and_then(|d| d.as_array()).into_iter().flatten() {
                    trades += 1;
                    let side = trade["side"].as_str().unwrap_or("?");
                    let side = if side == "Buy" { side.green() } else { side.red() };
                    println!(
                        "  {:>5} {:>12} x {:<8} {}",
                        side,
                        trade["price"],
                        trade["size"],
                        trade["timestamp"].as_str().unwrap_or_default()
                    );
                }
            }
            StreamEvent::Message { topic, .. } => println!("{} {}", "•".white(), topic),
            StreamEvent::Disconnected { reason } => {
                println!("{} Disconnected: {:?}", "✗".yellow(), reason);
                break;
            }
            _ => {}
        }

        if start.elapsed() > Duration::from_secs(30) {
            stream.shutdown();
        }
    }

    println!("\n  {} {} trades in {:?}", "•".white(), trades, start.elapsed());
    Ok(())
}
