//! Configuration Module
//! Loads settings from environment variables

use rust_decimal::Decimal;
use std::env;

use crate::engine::INITIAL_BALANCE;

#[derive(Debug, Clone)]
pub struct Config {
    pub initial_balance: Decimal,
    pub tick_interval_ms: u64,
    pub demo_ticks: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            initial_balance: env::var("LEDGER_INITIAL_BALANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(INITIAL_BALANCE),
            tick_interval_ms: env::var("LEDGER_TICK_INTERVAL_MS")
                .unwrap_or_else(|_| "250".to_string())
                .parse()
                .unwrap_or(250),
            demo_ticks: env::var("LEDGER_DEMO_TICKS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .unwrap_or(8),
        })
    }
}
