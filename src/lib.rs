//! Ledger Core - Virtual Stock Trading Ledger
//! Executes orders against simulated cash balances, maintains positions and
//! an immutable transaction history, and ranks accounts by total value.

pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod market;
pub mod observability;
pub mod valuation;

pub use config::Config;
pub use engine::account_store::{Account, AccountStore, Position};
pub use engine::order_processor::{ExecutionResult, OrderProcessor};
pub use engine::{CommitSink, NoopCommitSink, INITIAL_BALANCE};
pub use error::LedgerError;
pub use ledger::{Side, Transaction, TransactionLog, TransactionView};
pub use market::{Stock, StockDirectory};
pub use valuation::{AccountValuation, PortfolioReport, ValuationEngine};
