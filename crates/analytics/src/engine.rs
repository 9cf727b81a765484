// In crates/analytics/src/engine.rs

use crate::types::{EquityPoint, PerformanceReport, PerformanceSummary, Trade};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Below this a standard deviation is treated as zero.
const STD_DEV_EPSILON: f64 = 1e-15;

/// Simple period returns of a value series.
///
/// A step whose previous value is zero or negative contributes a return of 0.
pub fn daily_returns(values: &[Decimal]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| {
            if w[0] <= Decimal::ZERO {
                return 0.0;
            }
            ((w[1] - w[0]) / w[0]).to_f64().unwrap_or(0.0)
        })
        .collect()
}

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Population (ddof = 0) standard deviation.
pub fn population_std_dev(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let m = mean(xs);
    let variance = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64;
    variance.sqrt()
}

/// Per-period Sharpe ratio: `(mean(r) - rf) / std(r)` with `rf = annual_rate / periods`.
///
/// Returns 0.0 for an empty series or when the standard deviation is zero.
pub fn sharpe_ratio(returns: &[f64], annual_risk_free_rate: f64, periods_per_year: u32) -> f64 {
    if returns.is_empty() || periods_per_year == 0 {
        return 0.0;
    }
    let std_dev = population_std_dev(returns);
    if !std_dev.is_finite() || std_dev < STD_DEV_EPSILON {
        return 0.0;
    }
    let rf = annual_risk_free_rate / periods_per_year as f64;
    (mean(returns) - rf) / std_dev
}

/// Total return `(V_n - V_0) / V_0` as a fraction. 0.0 for fewer than two values or a
/// non-positive starting value.
pub fn total_return(values: &[Decimal]) -> f64 {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) if values.len() > 1 && *first > Decimal::ZERO => {
            ((*last - *first) / *first).to_f64().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// Largest peak-to-trough decline, as an absolute amount and a percentage of the peak.
pub fn max_drawdown(values: &[Decimal]) -> (Decimal, f64) {
    let Some(first) = values.first() else {
        return (Decimal::ZERO, 0.0);
    };
    let mut peak = *first;
    let mut max_abs = Decimal::ZERO;
    let mut max_pct = 0.0_f64;
    for value in values {
        peak = peak.max(*value);
        let drawdown = peak - *value;
        max_abs = max_abs.max(drawdown);
        if peak > Decimal::ZERO {
            let pct = (drawdown / peak).to_f64().unwrap_or(0.0) * 100.0;
            max_pct = max_pct.max(pct);
        }
    }
    (max_abs, max_pct)
}

/// The end-of-run summary over a daily value series.
pub fn summarize(
    values: &[Decimal],
    annual_risk_free_rate: f64,
    periods_per_year: u32,
) -> PerformanceSummary {
    let returns = daily_returns(values);
    PerformanceSummary {
        mean_return: mean(&returns),
        std_dev: population_std_dev(&returns),
        sharpe_ratio: sharpe_ratio(&returns, annual_risk_free_rate, periods_per_year),
        total_return: total_return(values),
        returns,
    }
}

/// The engine responsible for calculating performance metrics from run data.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    annual_risk_free_rate: f64,
    periods_per_year: u32,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(0.01, 252)
    }
}

impl AnalyticsEngine {
    pub fn new(annual_risk_free_rate: f64, periods_per_year: u32) -> Self {
        Self {
            annual_risk_free_rate,
            periods_per_year,
        }
    }

    /// Calculates a full performance report.
    ///
    /// `initial_capital` is the portfolio value before the first recorded day. `benchmark`
    /// is the first and last valid close of the traded symbol in the run window, used for
    /// the buy-and-hold comparison.
    pub fn calculate(
        &self,
        initial_capital: Decimal,
        trades: &[Trade],
        equity_curve: &[EquityPoint],
        benchmark: Option<(Decimal, Decimal)>,
    ) -> PerformanceReport {
        let values: Vec<Decimal> = equity_curve.iter().map(|p| p.value).collect();
        let mut report = PerformanceReport::new();

        report.summary = summarize(&values, self.annual_risk_free_rate, self.periods_per_year);

        report.starting_value = initial_capital;
        report.final_value = values.last().copied().unwrap_or(initial_capital);
        report.net_pnl_absolute = report.final_value - initial_capital;
        // Measured from the starting capital, so a fee paid on the first recorded day counts.
        report.summary.total_return = total_return(&[initial_capital, report.final_value]);

        let values: Vec<Decimal> = std::iter::once(initial_capital).chain(values).collect();
        let (max_abs, max_pct) = max_drawdown(&values);
        report.max_drawdown_absolute = max_abs;
        report.max_drawdown_percentage = max_pct;

        report.total_trades = trades.len() as u32;
        if !trades.is_empty() {
            let winners = trades.iter().filter(|t| t.is_winner()).count();
            report.win_rate = winners as f64 / trades.len() as f64 * 100.0;
        }

        report.benchmark_return = benchmark.and_then(|(first, last)| {
            (first > Decimal::ZERO).then(|| ((last - first) / first).to_f64().unwrap_or(0.0))
        });

        report
    }
}
