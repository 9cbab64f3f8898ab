//! Trading Engine Module
//! Contains the account store and order processing

pub mod account_store;
pub mod order_processor;

pub use account_store::{AccountStore, CommitSink, NoopCommitSink, INITIAL_BALANCE};
pub use order_processor::OrderProcessor;
