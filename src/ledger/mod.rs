//! Transaction Log
//! Append-only, immutable record of executed trades, keyed by account

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::market::StockDirectory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// One executed order. Created exactly once per successful execution and
/// never mutated; `price` is the stock's price at the moment of execution
/// and `total` is always `price * quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub stock_id: Uuid,
    pub side: Side,
    pub quantity: u64,
    pub price: Decimal,
    pub total: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        account_id: Uuid,
        stock_id: Uuid,
        side: Side,
        quantity: u64,
        price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            stock_id,
            side,
            quantity,
            price,
            total: price * Decimal::from(quantity),
            timestamp: Utc::now(),
        }
    }
}

/// Historical entry joined with the stock's display metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: Uuid,
    pub stock_symbol: String,
    pub stock_name: String,
    pub side: Side,
    pub quantity: u64,
    pub price: Decimal,
    pub total: Decimal,
    pub timestamp: DateTime<Utc>,
}

pub struct TransactionLog {
    entries: Arc<RwLock<HashMap<Uuid, Vec<Transaction>>>>,
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionLog {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn append(&self, transaction: Transaction) {
        let mut entries = self.entries.write().await;
        entries
            .entry(transaction.account_id)
            .or_default()
            .push(transaction);
    }

    /// Raw entries for an account, newest first.
    pub async fn entries_for_account(&self, account_id: Uuid) -> Vec<Transaction> {
        let entries = self.entries.read().await;
        entries
            .get(&account_id)
            .map(|log| log.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    /// History joined with the stock's *current* symbol and name, newest
    /// first. A renamed stock therefore shows its present name on old
    /// entries while `price`/`total` stay frozen at execution values.
    /// Entries whose stock no longer exists in the directory are skipped.
    pub async fn list_for_account(
        &self,
        account_id: Uuid,
        directory: &StockDirectory,
    ) -> Vec<TransactionView> {
        let transactions = self.entries_for_account(account_id).await;

        let mut views = Vec::with_capacity(transactions.len());
        for t in transactions {
            if let Some((symbol, name)) = directory.display_metadata(t.stock_id).await {
                views.push(TransactionView {
                    id: t.id,
                    stock_symbol: symbol,
                    stock_name: name,
                    side: t.side,
                    quantity: t.quantity,
                    price: t.price,
                    total: t.total,
                    timestamp: t.timestamp,
                });
            }
        }
        views
    }
}
