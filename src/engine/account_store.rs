//! Account Store
//! Owns each account's (cash balance, positions) aggregate and hands out
//! per-account locks; the unit of consistency and of concurrency control

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::LedgerError;
use crate::ledger::Transaction;

/// Starting cash for every new account, and the leaderboard's profit/loss
/// baseline. Single constant for both uses.
pub const INITIAL_BALANCE: Decimal = dec!(10000);

/// An account's holding in one stock. Exists only while quantity > 0;
/// `average_cost` is the quantity-weighted average price paid per share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub stock_id: Uuid,
    pub quantity: u64,
    pub average_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub cash_balance: Decimal,
    pub positions: HashMap<Uuid, Position>,
}

impl Account {
    fn new(name: String, cash_balance: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            cash_balance,
            positions: HashMap::new(),
        }
    }

    pub fn position(&self, stock_id: Uuid) -> Option<&Position> {
        self.positions.get(&stock_id)
    }

    /// Positions in a stable order (by stock id) for result payloads.
    pub fn positions_sorted(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.positions.values().cloned().collect();
        positions.sort_by_key(|p| p.stock_id);
        positions
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct PersistenceError(pub String);

/// Seam to an external persistence collaborator. Invoked with the full new
/// aggregate plus the transaction about to be logged, before any in-memory
/// state becomes visible: a failing sink aborts the whole commit.
pub trait CommitSink: Send + Sync {
    fn commit(&self, account: &Account, transaction: &Transaction) -> Result<(), PersistenceError>;
}

/// Default sink for in-memory deployments; always succeeds.
pub struct NoopCommitSink;

impl CommitSink for NoopCommitSink {
    fn commit(&self, _: &Account, _: &Transaction) -> Result<(), PersistenceError> {
        Ok(())
    }
}

pub struct AccountStore {
    initial_balance: Decimal,
    accounts: Arc<RwLock<HashMap<Uuid, Arc<RwLock<Account>>>>>,
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new(INITIAL_BALANCE)
    }
}

impl AccountStore {
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            initial_balance,
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn initial_balance(&self) -> Decimal {
        self.initial_balance
    }

    /// Register a new account with the starting balance. Names are stored
    /// lowercased and must be unique.
    pub async fn create_account(&self, name: &str) -> Result<Account, LedgerError> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(LedgerError::InvalidInput("Account name is required".into()));
        }

        let mut accounts = self.accounts.write().await;
        for existing in accounts.values() {
            if existing.read().await.name == name {
                return Err(LedgerError::AccountExists);
            }
        }

        let account = Account::new(name, self.initial_balance);
        let snapshot = account.clone();
        accounts.insert(account.id, Arc::new(RwLock::new(account)));

        tracing::info!(account = %snapshot.name, id = %snapshot.id, "Account created");
        Ok(snapshot)
    }

    /// The lockable aggregate for one account. Writers hold its write lock
    /// across their whole read-modify-commit cycle, which serializes orders
    /// per account without blocking other accounts.
    pub async fn aggregate(&self, account_id: Uuid) -> Result<Arc<RwLock<Account>>, LedgerError> {
        let accounts = self.accounts.read().await;
        accounts
            .get(&account_id)
            .cloned()
            .ok_or(LedgerError::AccountNotFound)
    }

    /// Point-in-time copy of one account.
    pub async fn snapshot(&self, account_id: Uuid) -> Result<Account, LedgerError> {
        let aggregate = self.aggregate(account_id).await?;
        let account = aggregate.read().await;
        Ok(account.clone())
    }

    /// All aggregates, for read-only scans. Callers take per-account read
    /// locks one at a time; the view across accounts is not instantaneous.
    pub async fn all(&self) -> Vec<Arc<RwLock<Account>>> {
        let accounts = self.accounts.read().await;
        accounts.values().cloned().collect()
    }
}
