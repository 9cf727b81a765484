pub mod error;
pub mod feed;
pub mod logger;
pub mod report;

pub use error::{Error, Result};
pub use feed::{DataFeed, VecDataFeed};
pub use logger::TradeLogger;
pub use report::print_report;

use analytics::engine::AnalyticsEngine;
use analytics::types::{EquityPoint, PerformanceReport, Trade};
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{Action, Execution};
use engine::{BarOutcome, Bot, DailySnapshot};
use execution::{Executor, SimulatedExecutor};
use rust_decimal::Decimal;

/// The inclusive calendar window a backtest replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RunWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let date = timestamp.date_naive();
        self.start <= date && date <= self.end
    }
}

/// Everything a finished backtest produced.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub report: PerformanceReport,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub snapshots: Vec<DailySnapshot>,
    /// Bars dated before the window that fed the indicator warm-up.
    pub history_bars: usize,
    /// Bars inside the window that had no valid price.
    pub skipped_bars: usize,
    /// Orders the simulated host refused.
    pub rejected_orders: usize,
}

/// The main engine for running historical backtests.
pub struct Backtester {
    pub bot: Bot,
    /// The simulated host: fills orders and keeps the portfolio.
    pub host: SimulatedExecutor,
    pub window: RunWindow,
    analytics: AnalyticsEngine,
    logger: TradeLogger,
}

impl Backtester {
    pub fn new(
        bot: Bot,
        host: SimulatedExecutor,
        window: RunWindow,
        analytics: AnalyticsEngine,
    ) -> Self {
        Self {
            bot,
            host,
            window,
            analytics,
            logger: TradeLogger::new(),
        }
    }

    /// Replays `feed` through the bot, then computes the report.
    ///
    /// Bars dated before the window's start only warm up the indicators. Trading, daily
    /// values and the benchmark cover the window itself.
    pub fn run(&mut self, feed: &mut dyn DataFeed) -> Result<BacktestResult> {
        tracing::info!(
            bot_id = %self.bot.id,
            executor = self.host.name(),
            taker_fee = self.host.settings().taker_fee,
            slippage = self.host.settings().slippage_percent,
            symbol = %feed.symbol(),
            start = %self.window.start,
            end = %self.window.end,
            "Starting backtest."
        );

        let starting_capital = self.host.portfolio().total_value();
        let mut snapshots = Vec::new();
        let mut history_bars = 0usize;
        let mut skipped_bars = 0;
        let mut rejected_orders = 0;
        let mut warned_short_history = false;
        let mut last_timestamp: Option<DateTime<Utc>> = None;
        let mut first_close: Option<Decimal> = None;
        let mut last_close: Option<Decimal> = None;

        while let Some(bar) = feed.next_bar() {
            if last_timestamp.is_some_and(|last| bar.timestamp <= last) {
                tracing::warn!(time = %bar.timestamp, "Bar is not after the previous bar; dropping.");
                continue;
            }
            last_timestamp = Some(bar.timestamp);

            if bar.timestamp.date_naive() < self.window.start {
                if self.bot.warm_up(&bar) == BarOutcome::WarmingUp {
                    history_bars += 1;
                }
                continue;
            }
            if !self.window.contains(bar.timestamp) {
                break;
            }

            // --- 1. Mark the host to the bar's close before the bot sees it ---
            let close = bar.valid_close().ok();
            if let Some(close) = close {
                self.host.mark(close);
            }

            // --- 2. Let the bot process the bar ---
            match self.bot.on_bar(&bar, &mut self.host) {
                BarOutcome::Skipped(_) => skipped_bars += 1,
                BarOutcome::WarmingUp => {
                    if !warned_short_history {
                        tracing::warn!(
                            bot_id = %self.bot.id,
                            history_bars,
                            "Not enough price history before the start date; warming up inside the run window."
                        );
                        warned_short_history = true;
                    }
                    continue;
                }
                BarOutcome::Decided {
                    action,
                    execution: Some(execution),
                } => self.log_fill(action, &execution),
                BarOutcome::Decided { execution: None, .. } => {}
                BarOutcome::Rejected { .. } => rejected_orders += 1,
            }

            // --- 3. End-of-day bookkeeping, only once the bot is warmed up ---
            if !self.bot.signal_generator().is_ready() {
                continue;
            }
            if let Some(close) = close {
                first_close.get_or_insert(close);
                last_close = Some(close);
            }
            let snapshot = self.bot.snapshot(&bar, &self.host);
            self.logger
                .record_equity(snapshot.timestamp, snapshot.portfolio_value);
            snapshots.push(snapshot);
        }

        if !self.bot.signal_generator().is_ready() {
            tracing::warn!(
                bot_id = %self.bot.id,
                "Run ended before warm-up completed; no daily values were recorded."
            );
        }
        if let Some(entry) = self.logger.open_entry() {
            tracing::info!(
                entry_price = %entry.price,
                quantity = entry.quantity,
                "Position still open at end of run."
            );
        }

        // --- Analytics Calculation & Reporting ---
        let benchmark = first_close.zip(last_close);
        let report = self.analytics.calculate(
            starting_capital,
            &self.logger.trades,
            &self.logger.equity_curve,
            benchmark,
        );

        tracing::info!(
            sharpe_ratio = report.summary.sharpe_ratio,
            total_return_pct = report.summary.total_return_percentage(),
            days = self.logger.equity_curve.len(),
            trades = report.total_trades,
            "Backtest finished."
        );

        Ok(BacktestResult {
            report,
            trades: self.logger.trades.clone(),
            equity_curve: self.logger.equity_curve.clone(),
            snapshots,
            history_bars,
            skipped_bars,
            rejected_orders,
        })
    }

    fn log_fill(&mut self, action: Action, execution: &Execution) {
        match action {
            Action::EnterLong => self.logger.record_entry(execution),
            Action::Exit(reason) => {
                if let Some(trade) = self.logger.record_exit(execution, reason) {
                    tracing::info!(pnl = %trade.pnl, reason = %reason, "Trade closed.");
                }
            }
            Action::Hold => {}
        }
    }
}
