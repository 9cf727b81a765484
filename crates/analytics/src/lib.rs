//! End-of-run performance analytics.
//!
//! Everything here is a pure reduction over recorded values: no dependency on the
//! signal generator, the position manager or the execution host.

pub mod engine;
pub mod types;

pub use engine::{
    AnalyticsEngine, daily_returns, max_drawdown, mean, population_std_dev, sharpe_ratio,
    summarize, total_return,
};
pub use types::{EquityPoint, PerformanceReport, PerformanceSummary, Trade};
