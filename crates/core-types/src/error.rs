// In crates/core-types/src/error.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Data-quality problems with a single observation. Never fatal: the bar is skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("No price available at {timestamp}")]
    MissingPrice { timestamp: DateTime<Utc> },

    #[error("Invalid price {price} at {timestamp}: prices must be positive")]
    InvalidPrice {
        timestamp: DateTime<Utc>,
        price: Decimal,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
