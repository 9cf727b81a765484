// In crates/backtester/src/logger.rs

use analytics::types::{EquityPoint, Trade};
use chrono::{DateTime, Utc};
use core_types::{Execution, ExitReason};
use rust_decimal::Decimal;

/// Records round-trip trades and the daily equity curve during a backtest.
#[derive(Debug, Default)]
pub struct TradeLogger {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    open_entry: Option<Execution>,
}

impl TradeLogger {
    /// Creates a new, empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a point in the equity curve.
    pub fn record_equity(&mut self, timestamp: DateTime<Utc>, value: Decimal) {
        self.equity_curve.push(EquityPoint { timestamp, value });
    }

    /// Remembers the fill that opened the current position.
    pub fn record_entry(&mut self, execution: &Execution) {
        if let Some(previous) = self.open_entry.replace(execution.clone()) {
            tracing::warn!(?previous, "Entry recorded while another entry was still open.");
        }
    }

    /// Pairs `execution` with the open entry and records the completed trade.
    ///
    /// An exit with no recorded entry (a position adopted from the host) is kept out of
    /// the trade log.
    pub fn record_exit(&mut self, execution: &Execution, exit_reason: ExitReason) -> Option<&Trade> {
        let Some(entry) = self.open_entry.take() else {
            tracing::warn!(?execution, "Exit without a recorded entry; trade not logged.");
            return None;
        };

        let fees = entry.fee + execution.fee;
        let quantity = Decimal::from(entry.quantity);
        let pnl = (execution.price - entry.price) * quantity - fees;

        self.trades.push(Trade {
            symbol: entry.symbol,
            entry_time: entry.timestamp,
            exit_time: execution.timestamp,
            entry_price: entry.price,
            exit_price: execution.price,
            quantity: entry.quantity,
            pnl,
            fees,
            exit_reason,
        });
        self.trades.last()
    }

    /// The entry fill of a position still open at the end of the run.
    pub fn open_entry(&self) -> Option<&Execution> {
        self.open_entry.as_ref()
    }
}
