//! Ledger Error Taxonomy
//! Closed set of rejection and failure kinds returned by the trading core

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Stock not found")]
    StockNotFound,

    #[error("Account already exists")]
    AccountExists,

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("No position in this stock")]
    NoPosition,

    #[error("Insufficient shares: requested {requested}, held {held}")]
    InsufficientShares { requested: u64, held: u64 },

    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl LedgerError {
    /// Stable machine-readable code, used as a log field and in responses.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidInput(_) => "INVALID_INPUT",
            LedgerError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            LedgerError::StockNotFound => "STOCK_NOT_FOUND",
            LedgerError::AccountExists => "ACCOUNT_EXISTS",
            LedgerError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            LedgerError::NoPosition => "NO_POSITION",
            LedgerError::InsufficientShares { .. } => "INSUFFICIENT_SHARES",
            LedgerError::Persistence(_) => "PERSISTENCE_FAILURE",
        }
    }
}
