//! Stock Directory
//! Read-side catalog of tradable stocks with externally driven prices

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::LedgerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub current_price: Decimal,
    pub previous_close: Decimal,
    pub open_price: Decimal,
    pub day_high: Decimal,
    pub day_low: Decimal,
    pub volume: u64,
    pub price_history: Vec<PricePoint>,
}

impl Stock {
    pub fn new(symbol: &str, name: &str, price: Decimal, volume: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            current_price: price,
            previous_close: price,
            open_price: price,
            day_high: price,
            day_low: price,
            volume,
            price_history: vec![PricePoint {
                price,
                timestamp: Utc::now(),
            }],
        }
    }
}

/// Shared stock catalog. The ledger only reads from it; price mutation is
/// driven by an external feed calling [`StockDirectory::update_price`].
pub struct StockDirectory {
    stocks: Arc<RwLock<HashMap<Uuid, Stock>>>,
}

impl Default for StockDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl StockDirectory {
    pub fn new() -> Self {
        Self {
            stocks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, stock: Stock) -> Uuid {
        let id = stock.id;
        let mut stocks = self.stocks.write().await;
        stocks.insert(id, stock);
        id
    }

    pub async fn get(&self, stock_id: Uuid) -> Option<Stock> {
        let stocks = self.stocks.read().await;
        stocks.get(&stock_id).cloned()
    }

    /// Price at this instant. The caller treats it as authoritative for the
    /// order being executed; it is never re-validated against later ticks.
    pub async fn current_price(&self, stock_id: Uuid) -> Result<Decimal, LedgerError> {
        let stocks = self.stocks.read().await;
        stocks
            .get(&stock_id)
            .map(|s| s.current_price)
            .ok_or(LedgerError::StockNotFound)
    }

    /// Symbol and display name as they are *now*. Historical views join
    /// against this, so a renamed stock shows its new name on old entries.
    pub async fn display_metadata(&self, stock_id: Uuid) -> Option<(String, String)> {
        let stocks = self.stocks.read().await;
        stocks
            .get(&stock_id)
            .map(|s| (s.symbol.clone(), s.name.clone()))
    }

    pub async fn list(&self) -> Vec<Stock> {
        let stocks = self.stocks.read().await;
        stocks.values().cloned().collect()
    }

    /// Apply a new tick: the old current price becomes the previous close
    /// and the tick is appended to the history.
    pub async fn update_price(&self, stock_id: Uuid, price: Decimal) -> Result<(), LedgerError> {
        let mut stocks = self.stocks.write().await;
        let stock = stocks.get_mut(&stock_id).ok_or(LedgerError::StockNotFound)?;

        stock.previous_close = stock.current_price;
        stock.current_price = price;
        if price > stock.day_high {
            stock.day_high = price;
        }
        if price < stock.day_low {
            stock.day_low = price;
        }
        stock.price_history.push(PricePoint {
            price,
            timestamp: Utc::now(),
        });

        tracing::debug!(stock = %stock.symbol, price = %price, "Price updated");
        Ok(())
    }
}
