//! Ledger Core - demo binary
//! Seeds a small market, runs a burst of concurrent orders against two
//! accounts while prices tick, then prints history and the leaderboard.

use futures::future::join_all;
use ledger_core::{
    Config, AccountStore, NoopCommitSink, OrderProcessor, Side, Stock, StockDirectory,
    TransactionLog, ValuationEngine,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    ledger_core::observability::init_tracing("ledger-core")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        initial_balance = %config.initial_balance,
        "Starting Ledger Core demo..."
    );

    let store = Arc::new(AccountStore::new(config.initial_balance));
    let directory = Arc::new(StockDirectory::new());
    let log = Arc::new(TransactionLog::new());
    let processor = Arc::new(OrderProcessor::new(
        store.clone(),
        directory.clone(),
        log.clone(),
        Arc::new(NoopCommitSink),
    ));
    let valuation = ValuationEngine::new(store.clone(), directory.clone());

    // Seed market and accounts
    let acme = directory
        .insert(Stock::new("ACME", "Acme Corp", dec!(50), 1_000_000))
        .await;
    let glob = directory
        .insert(Stock::new("GLOB", "Globex International", dec!(120), 500_000))
        .await;

    let alice = store.create_account("alice").await?.id;
    let bob = store.create_account("bob").await?.id;
    info!("Seeded 2 stocks and 2 accounts");

    // Externally driven price feed: a deterministic drift per tick
    let feed_directory = directory.clone();
    let tick_interval = Duration::from_millis(config.tick_interval_ms);
    let demo_ticks = config.demo_ticks;
    let feed = tokio::spawn(async move {
        let mut drift = dec!(1);
        for _ in 0..demo_ticks {
            tokio::time::sleep(tick_interval).await;
            for stock in feed_directory.list().await {
                let next = stock.current_price + drift;
                if let Err(e) = feed_directory.update_price(stock.id, next).await {
                    error!(error = %e, "Price update failed");
                }
            }
            drift = -drift * Decimal::from(2) / Decimal::from(3);
        }
    });

    // Concurrent order flow against both accounts
    let orders = vec![
        (alice, acme, Side::Buy, 10),
        (alice, glob, Side::Buy, 5),
        (bob, acme, Side::Buy, 40),
        (alice, acme, Side::Buy, 5),
        (bob, acme, Side::Sell, 15),
        (alice, acme, Side::Sell, 15),
    ];

    let results = join_all(orders.into_iter().map(|(account, stock, side, qty)| {
        let processor = processor.clone();
        async move { processor.execute_order(account, stock, side, qty).await }
    }))
    .await;

    for result in results {
        match result {
            Ok(execution) => info!(
                balance = %execution.updated_cash_balance,
                open_positions = execution.updated_positions.len(),
                "Execution confirmed"
            ),
            Err(e) => error!(code = e.code(), error = %e, "Order rejected"),
        }
    }

    feed.await?;

    // Reports
    let history = log.list_for_account(alice, &directory).await;
    println!("{}", serde_json::to_string_pretty(&history)?);

    let portfolio = valuation.account_portfolio(bob).await?;
    println!("{}", serde_json::to_string_pretty(&portfolio)?);

    let leaderboard = valuation.compute_leaderboard().await;
    println!("{}", serde_json::to_string_pretty(&leaderboard)?);

    info!("Ledger Core demo finished");
    Ok(())
}
