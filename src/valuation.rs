//! Valuation Engine
//! Read-only leaderboard and portfolio reporting against current prices

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::engine::account_store::{Account, AccountStore};
use crate::error::LedgerError;
use crate::market::StockDirectory;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountValuation {
    pub account_id: Uuid,
    pub display_name: String,
    pub portfolio_value: Decimal,
    pub cash_balance: Decimal,
    pub total_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percentage: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionReport {
    pub stock_id: Uuid,
    pub stock_symbol: String,
    pub stock_name: String,
    pub current_price: Decimal,
    pub quantity: u64,
    pub average_cost: Decimal,
    pub current_value: Decimal,
    pub profit_loss: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub account_id: Uuid,
    pub cash_balance: Decimal,
    pub positions: Vec<PositionReport>,
}

pub struct ValuationEngine {
    store: Arc<AccountStore>,
    directory: Arc<StockDirectory>,
}

impl ValuationEngine {
    pub fn new(store: Arc<AccountStore>, directory: Arc<StockDirectory>) -> Self {
        Self { store, directory }
    }

    /// Rank all accounts by total value (cash + positions at current market
    /// price), descending. Takes only per-account read locks, one account
    /// at a time: the snapshot is informational, not instantaneous, and
    /// never blocks in-flight orders. Ties break by account name, then id.
    pub async fn compute_leaderboard(&self) -> Vec<AccountValuation> {
        let baseline = self.store.initial_balance();
        let mut board = Vec::new();

        for aggregate in self.store.all().await {
            let account = aggregate.read().await.clone();
            board.push(self.value_account(&account, baseline).await);
        }

        board.sort_by(|a, b| {
            b.total_value
                .cmp(&a.total_value)
                .then_with(|| a.display_name.cmp(&b.display_name))
                .then_with(|| a.account_id.cmp(&b.account_id))
        });
        board
    }

    /// Per-position report for one account: current value and unrealized
    /// profit/loss against the average cost basis.
    pub async fn account_portfolio(&self, account_id: Uuid) -> Result<PortfolioReport, LedgerError> {
        let account = self.store.snapshot(account_id).await?;

        let mut positions = Vec::with_capacity(account.positions.len());
        for position in account.positions_sorted() {
            let stock = match self.directory.get(position.stock_id).await {
                Some(s) => s,
                None => continue,
            };
            let quantity = Decimal::from(position.quantity);
            let current_value = quantity * stock.current_price;
            positions.push(PositionReport {
                stock_id: stock.id,
                stock_symbol: stock.symbol,
                stock_name: stock.name,
                current_price: stock.current_price,
                quantity: position.quantity,
                average_cost: position.average_cost,
                current_value,
                profit_loss: current_value - quantity * position.average_cost,
            });
        }

        Ok(PortfolioReport {
            account_id: account.id,
            cash_balance: account.cash_balance,
            positions,
        })
    }

    async fn value_account(&self, account: &Account, baseline: Decimal) -> AccountValuation {
        let mut portfolio_value = Decimal::ZERO;
        for position in account.positions.values() {
            // Positions whose stock is missing from the directory
            // contribute nothing.
            if let Ok(price) = self.directory.current_price(position.stock_id).await {
                portfolio_value += Decimal::from(position.quantity) * price;
            }
        }

        let total_value = portfolio_value + account.cash_balance;
        let profit_loss = total_value - baseline;
        let profit_loss_percentage = profit_loss / baseline * dec!(100);

        AccountValuation {
            account_id: account.id,
            display_name: account.name.clone(),
            portfolio_value,
            cash_balance: account.cash_balance,
            total_value,
            profit_loss,
            profit_loss_percentage,
        }
    }
}
