// In crates/backtester/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read price data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to open price data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid run window: start {start} is after end {end}")]
    InvalidWindow {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
