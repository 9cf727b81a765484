// In crates/execution/src/error.rs

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Execution failed: {reason}")]
    ExecutionFailed { reason: String },

    #[error("Insufficient cash ({cash}) to buy one share at {price}")]
    InsufficientFunds { cash: Decimal, price: Decimal },

    #[error("No open position found for symbol {symbol}")]
    NoOpenPosition { symbol: String },

    #[error("Symbol {symbol} is not tracked by this portfolio")]
    UnknownSymbol { symbol: String },

    #[error("Invalid simulation settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, Error>;
