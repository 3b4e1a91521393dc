//! Fetch recent transactions example.
//!
//! Reads `PAYPAL_CLIENT_ID` and `PAYPAL_CLIENT_SECRET` and prints every
//! sandbox transaction of the last `DAYS` days (default 90).
//!
//! Run with: RUST_LOG=paypal_reporting=debug cargo run --example fetch_transactions

use chrono::{Duration, Utc};
use paypal_reporting::{Environment, PaypalClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> paypal_reporting::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let days: i64 = std::env::var("DAYS")
        .ok()
        .and_then(|d| d.parse().ok())
        .unwrap_or(90);

    let client = PaypalClient::from_env(Environment::Sandbox)?;

    println!("Fetching {} days of transactions...", days);
    let transactions = client
        .fetch_transactions(Utc::now() - Duration::days(days), None)
        .await?;

    println!("Found {} transaction(s):", transactions.len());
    for txn in &transactions {
        let amount = txn
            .amount()
            .map(|a| format!("{} {}", a.value, a.currency_code))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  - {} [{}] {} at {}",
            txn.transaction_id().unwrap_or("?"),
            txn.transaction_status().unwrap_or("?"),
            amount,
            txn.initiation_date()
                .map(|d| d.to_rfc3339())
                .unwrap_or_default()
        );
    }

    Ok(())
}
