//! Integration tests for the Transaction Log
//! Ordering and the read-time join with live stock metadata

use ledger_core::{
    AccountStore, NoopCommitSink, OrderProcessor, Side, Stock, StockDirectory, TransactionLog,
};
use rust_decimal_macros::dec;
use std::sync::Arc;

struct Harness {
    store: Arc<AccountStore>,
    directory: Arc<StockDirectory>,
    log: Arc<TransactionLog>,
    processor: OrderProcessor,
}

fn build() -> Harness {
    let store = Arc::new(AccountStore::default());
    let directory = Arc::new(StockDirectory::new());
    let log = Arc::new(TransactionLog::new());
    let processor = OrderProcessor::new(
        store.clone(),
        directory.clone(),
        log.clone(),
        Arc::new(NoopCommitSink),
    );
    Harness {
        store,
        directory,
        log,
        processor,
    }
}

#[tokio::test]
async fn history_is_newest_first() {
    let h = build();
    let stock = h
        .directory
        .insert(Stock::new("ACME", "Acme Corp", dec!(50), 1_000))
        .await;
    let account = h.store.create_account("trader").await.unwrap().id;

    h.processor
        .execute_order(account, stock, Side::Buy, 10)
        .await
        .unwrap();
    h.processor
        .execute_order(account, stock, Side::Buy, 5)
        .await
        .unwrap();
    h.processor
        .execute_order(account, stock, Side::Sell, 15)
        .await
        .unwrap();

    let history = h.log.list_for_account(account, &h.directory).await;
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].side, Side::Sell);
    assert_eq!(history[0].quantity, 15);
    assert_eq!(history[2].side, Side::Buy);
    assert_eq!(history[2].quantity, 10);
    assert!(history[0].timestamp >= history[1].timestamp);
    assert!(history[1].timestamp >= history[2].timestamp);
}

#[tokio::test]
async fn history_joins_current_metadata_but_freezes_money() {
    let h = build();
    let stock = h
        .directory
        .insert(Stock::new("ACME", "Acme Corp", dec!(50), 1_000))
        .await;
    let account = h.store.create_account("trader").await.unwrap().id;

    h.processor
        .execute_order(account, stock, Side::Buy, 2)
        .await
        .unwrap();
    h.directory.update_price(stock, dec!(90)).await.unwrap();

    let history = h.log.list_for_account(account, &h.directory).await;
    assert_eq!(history.len(), 1);
    // Symbol and name come from the directory at read time...
    assert_eq!(history[0].stock_symbol, "ACME");
    assert_eq!(history[0].stock_name, "Acme Corp");
    // ...while price and total stay frozen at execution values.
    assert_eq!(history[0].price, dec!(50));
    assert_eq!(history[0].total, dec!(100));
}

#[tokio::test]
async fn renamed_stock_shows_new_name_on_old_entries() {
    let h = build();
    let stock = h
        .directory
        .insert(Stock::new("ACME", "Acme Corp", dec!(50), 1_000))
        .await;
    let account = h.store.create_account("trader").await.unwrap().id;

    h.processor
        .execute_order(account, stock, Side::Buy, 3)
        .await
        .unwrap();

    // Rebrand the stock under the same id.
    let mut rebranded = h.directory.get(stock).await.unwrap();
    rebranded.symbol = "ACMX".to_string();
    rebranded.name = "Acme Holdings".to_string();
    h.directory.insert(rebranded).await;

    let history = h.log.list_for_account(account, &h.directory).await;
    assert_eq!(history.len(), 1);
    // The join happens at read time, so old entries carry the new identity...
    assert_eq!(history[0].stock_symbol, "ACMX");
    assert_eq!(history[0].stock_name, "Acme Holdings");
    // ...while the executed money stays frozen.
    assert_eq!(history[0].price, dec!(50));
    assert_eq!(history[0].total, dec!(150));
}

#[tokio::test]
async fn history_is_scoped_per_account() {
    let h = build();
    let stock = h
        .directory
        .insert(Stock::new("ACME", "Acme Corp", dec!(50), 1_000))
        .await;
    let alice = h.store.create_account("alice").await.unwrap().id;
    let bob = h.store.create_account("bob").await.unwrap().id;

    h.processor
        .execute_order(alice, stock, Side::Buy, 1)
        .await
        .unwrap();

    assert_eq!(h.log.list_for_account(alice, &h.directory).await.len(), 1);
    assert!(h.log.list_for_account(bob, &h.directory).await.is_empty());
}
