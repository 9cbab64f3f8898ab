//! Order Processing Engine
//! Validates and executes buy/sell orders against one account, committing
//! balance, position, and log changes as a single unit

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::engine::account_store::{Account, AccountStore, CommitSink, Position};
use crate::error::LedgerError;
use crate::ledger::{Side, Transaction, TransactionLog};
use crate::market::StockDirectory;

// =====================================================
// EXECUTION RESULT
// =====================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub transaction: Transaction,
    pub updated_cash_balance: Decimal,
    pub updated_positions: Vec<Position>,
}

// =====================================================
// ORDER PROCESSOR
// =====================================================

pub struct OrderProcessor {
    store: Arc<AccountStore>,
    directory: Arc<StockDirectory>,
    log: Arc<TransactionLog>,
    sink: Arc<dyn CommitSink>,
}

impl OrderProcessor {
    pub fn new(
        store: Arc<AccountStore>,
        directory: Arc<StockDirectory>,
        log: Arc<TransactionLog>,
        sink: Arc<dyn CommitSink>,
    ) -> Self {
        Self {
            store,
            directory,
            log,
            sink,
        }
    }

    /// Execute one order. Holds the account's write lock across the whole
    /// read-validate-commit cycle, so two orders on the same account never
    /// interleave; orders on other accounts are unaffected. Any rejection
    /// leaves the account exactly as it was.
    pub async fn execute_order(
        &self,
        account_id: Uuid,
        stock_id: Uuid,
        side: Side,
        quantity: u64,
    ) -> Result<ExecutionResult, LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::InvalidInput(
                "Quantity must be a positive integer".into(),
            ));
        }

        let aggregate = self.store.aggregate(account_id).await?;
        let mut account = aggregate.write().await;

        // Price read under the lock is the authoritative execution price;
        // later ticks do not re-validate an in-flight order.
        let price = self.directory.current_price(stock_id).await?;

        let updated = match side {
            Side::Buy => Self::apply_buy(&account, stock_id, quantity, price)?,
            Side::Sell => Self::apply_sell(&account, stock_id, quantity, price)?,
        };

        let transaction = Transaction::new(account_id, stock_id, side, quantity, price);

        // Persist first; only a successful sink commit publishes state.
        self.sink
            .commit(&updated, &transaction)
            .map_err(|e| LedgerError::Persistence(e.to_string()))?;

        *account = updated;
        self.log.append(transaction.clone()).await;

        let result = ExecutionResult {
            updated_cash_balance: account.cash_balance,
            updated_positions: account.positions_sorted(),
            transaction,
        };
        drop(account);

        tracing::info!(
            account_id = %account_id,
            stock_id = %stock_id,
            side = %side,
            quantity,
            price = %price,
            total = %result.transaction.total,
            "Order executed"
        );

        Ok(result)
    }

    // =====================================================
    // BUY / SELL
    // =====================================================

    fn apply_buy(
        account: &Account,
        stock_id: Uuid,
        quantity: u64,
        price: Decimal,
    ) -> Result<Account, LedgerError> {
        let cost = price * Decimal::from(quantity);

        if account.cash_balance < cost {
            return Err(LedgerError::InsufficientFunds {
                required: cost,
                available: account.cash_balance,
            });
        }

        let mut updated = account.clone();

        match updated.positions.get_mut(&stock_id) {
            Some(position) => {
                // Weighted average cost basis, kept exact until display:
                // new_avg = (old_qty * old_avg + qty * p) / (old_qty + qty)
                let old_qty = Decimal::from(position.quantity);
                let new_qty = position.quantity + quantity;
                position.average_cost = (old_qty * position.average_cost
                    + Decimal::from(quantity) * price)
                    / Decimal::from(new_qty);
                position.quantity = new_qty;
            }
            None => {
                updated.positions.insert(
                    stock_id,
                    Position {
                        stock_id,
                        quantity,
                        average_cost: price,
                    },
                );
            }
        }

        updated.cash_balance -= cost;
        Ok(updated)
    }

    fn apply_sell(
        account: &Account,
        stock_id: Uuid,
        quantity: u64,
        price: Decimal,
    ) -> Result<Account, LedgerError> {
        let held = match account.position(stock_id) {
            Some(position) => position.quantity,
            None => return Err(LedgerError::NoPosition),
        };

        if quantity > held {
            return Err(LedgerError::InsufficientShares {
                requested: quantity,
                held,
            });
        }

        let proceeds = price * Decimal::from(quantity);
        let mut updated = account.clone();

        // Average cost stays unchanged for remaining shares; realized P&L
        // for the sold lot is not tracked.
        if quantity == held {
            updated.positions.remove(&stock_id);
        } else if let Some(position) = updated.positions.get_mut(&stock_id) {
            position.quantity = held - quantity;
        }

        updated.cash_balance += proceeds;
        Ok(updated)
    }
}
