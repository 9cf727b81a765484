// In crates/analytics/src/types.rs

use chrono::{DateTime, Utc};
use core_types::{ExitReason, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A comprehensive record of a single closed trade, from entry to exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: Symbol,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub quantity: i64,
    pub pnl: Decimal,
    pub fees: Decimal,
    pub exit_reason: ExitReason,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.pnl > Decimal::ZERO
    }
}

/// One recorded end-of-day total portfolio value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Decimal,
}

/// The end-of-run reduction over the daily value series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PerformanceSummary {
    /// Simple returns `r_i = (V_i - V_{i-1}) / V_{i-1}`.
    pub returns: Vec<f64>,
    pub mean_return: f64,
    /// Population standard deviation of `returns`.
    pub std_dev: f64,
    /// Per-period Sharpe ratio; 0 when the returns have no variance.
    pub sharpe_ratio: f64,
    /// `(V_n - V_0) / V_0` as a fraction.
    pub total_return: f64,
}

impl PerformanceSummary {
    pub fn total_return_percentage(&self) -> f64 {
        self.total_return * 100.0
    }
}

/// A full report of a backtest: the summary plus trade and drawdown statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PerformanceReport {
    pub summary: PerformanceSummary,
    pub starting_value: Decimal,
    pub final_value: Decimal,
    pub net_pnl_absolute: Decimal,
    pub max_drawdown_absolute: Decimal,
    pub max_drawdown_percentage: f64,
    pub total_trades: u32,
    pub win_rate: f64,
    /// Buy-and-hold return of the traded symbol over the same window, as a fraction.
    pub benchmark_return: Option<f64>,
}

impl PerformanceReport {
    /// Creates a new, empty report with zero values.
    pub fn new() -> Self {
        Self::default()
    }
}
