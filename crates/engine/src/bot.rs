// In crates/engine/src/bot.rs

use crate::reconciler::reconcile;
use chrono::{DateTime, Utc};
use core_types::{Action, Execution, ExitReason, PositionState, PriceBar, Symbol};
use execution::{Executor, PortfolioAccounting};
use risk::PositionManager;
use rust_decimal::Decimal;
use strategies::SignalGenerator;

/// What happened to a single bar.
#[derive(Debug, Clone, PartialEq)]
pub enum BarOutcome {
    /// The bar had no usable price; nothing was updated.
    Skipped(core_types::Error),
    /// Indicators were updated but no decision is made yet.
    WarmingUp,
    /// A decision was made; `execution` is set when an order was filled.
    Decided {
        action: Action,
        execution: Option<Execution>,
    },
    /// The host refused the order. The position is left untouched.
    Rejected {
        action: Action,
        error: execution::Error,
    },
}

/// End-of-day values reported after each bar.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySnapshot {
    pub timestamp: DateTime<Utc>,
    pub portfolio_value: Decimal,
    /// The bar's close, `None` when the bar had no valid price.
    pub price: Option<Decimal>,
    pub fast_ma: Option<f64>,
    pub slow_ma: Option<f64>,
    pub holdings: i64,
}

/// A single-symbol trend-following trader.
///
/// The bot owns the signal generator, the position manager and its own
/// `PositionState`. The host's execution and accounting capabilities are passed in on
/// every call rather than owned.
pub struct Bot {
    /// A unique identifier for this bot instance (e.g., "TSLA_daily_MACrossover").
    pub id: String,
    pub symbol: Symbol,
    signal_generator: Box<dyn SignalGenerator + Send>,
    position_manager: Box<dyn PositionManager + Send>,
    position: PositionState,
}

impl Bot {
    /// Creates a new `Bot` instance.
    pub fn new(
        symbol: Symbol,
        signal_generator: Box<dyn SignalGenerator + Send>,
        position_manager: Box<dyn PositionManager + Send>,
    ) -> Self {
        let id = format!("{}_daily_{}", symbol, signal_generator.name());
        tracing::info!(id = %id, manager = position_manager.name(), "Creating new bot instance.");

        Self {
            id,
            symbol,
            signal_generator,
            position_manager,
            position: PositionState::flat(),
        }
    }

    pub fn position(&self) -> &PositionState {
        &self.position
    }

    pub fn signal_generator(&self) -> &dyn SignalGenerator {
        self.signal_generator.as_ref()
    }

    /// Processes one bar to completion: indicators, signal, decision, at most one
    /// order, and the resulting state change.
    pub fn on_bar<H>(&mut self, bar: &PriceBar, host: &mut H) -> BarOutcome
    where
        H: Executor + PortfolioAccounting + ?Sized,
    {
        // --- 0. Data quality: a bar without a valid price is skipped entirely ---
        let close = match bar.valid_close() {
            Ok(close) => close,
            Err(error) => {
                tracing::warn!(
                    bot_id = %self.id,
                    symbol = %self.symbol,
                    time = %bar.timestamp,
                    %error,
                    "No valid data for bar; skipping."
                );
                return BarOutcome::Skipped(error);
            }
        };

        // --- 1. Update indicators ---
        self.signal_generator.update(close);
        if !self.signal_generator.is_ready() {
            return BarOutcome::WarmingUp;
        }

        // --- 2. Read holdings from accounting ---
        reconcile(
            &mut self.position,
            host.holdings(&self.symbol),
            close,
            &self.symbol,
        );

        // --- 3. Decide ---
        let signal = self.signal_generator.crossover();
        let action = self.position_manager.decide(signal, close, &self.position);

        // --- 4. Execute ---
        let result = match action {
            Action::Hold => {
                return BarOutcome::Decided {
                    action,
                    execution: None,
                };
            }
            Action::EnterLong => host.enter_full_long(&self.symbol, close, bar.timestamp),
            Action::Exit(_) => host.liquidate(&self.symbol, close, bar.timestamp),
        };

        match result {
            Ok(execution) => {
                // --- 5. Apply the executed action to our own state ---
                self.position
                    .apply(action, close, host.holdings(&self.symbol));
                debug_assert!(self.position.is_consistent());
                self.log_execution(action, &execution);
                BarOutcome::Decided {
                    action,
                    execution: Some(execution),
                }
            }
            Err(error) => {
                tracing::error!(
                    bot_id = %self.id,
                    symbol = %self.symbol,
                    ?action,
                    %error,
                    "Order was rejected by the host."
                );
                BarOutcome::Rejected { action, error }
            }
        }
    }

    /// Feeds a bar from before the run window into the indicators only.
    ///
    /// No decision is made and the host is never touched, even once the indicators are
    /// ready.
    pub fn warm_up(&mut self, bar: &PriceBar) -> BarOutcome {
        match bar.valid_close() {
            Ok(close) => {
                self.signal_generator.update(close);
                BarOutcome::WarmingUp
            }
            Err(error) => {
                tracing::debug!(bot_id = %self.id, time = %bar.timestamp, %error, "No valid history for bar.");
                BarOutcome::Skipped(error)
            }
        }
    }

    /// Builds and logs the end-of-day snapshot for `bar`.
    pub fn snapshot<A>(&self, bar: &PriceBar, accounting: &A) -> DailySnapshot
    where
        A: PortfolioAccounting + ?Sized,
    {
        let averages = self.signal_generator.averages();
        let snapshot = DailySnapshot {
            timestamp: bar.timestamp,
            portfolio_value: accounting.total_value(),
            price: bar.valid_close().ok(),
            fast_ma: averages.fast,
            slow_ma: averages.slow,
            holdings: accounting.holdings(&self.symbol),
        };

        let price = snapshot
            .price
            .map_or_else(|| "not available".to_string(), |p| p.to_string());
        tracing::info!(
            date = %snapshot.timestamp.date_naive(),
            portfolio_value = %snapshot.portfolio_value,
            price = %price,
            fast_ma = ?snapshot.fast_ma,
            slow_ma = ?snapshot.slow_ma,
            holdings = snapshot.holdings,
            "Daily snapshot for {}.",
            self.symbol
        );
        snapshot
    }

    fn log_execution(&self, action: Action, execution: &Execution) {
        match action {
            Action::EnterLong => tracing::info!(
                bot_id = %self.id,
                quantity = execution.quantity,
                "Buying {} at {}",
                self.symbol,
                execution.price
            ),
            Action::Exit(reason) => {
                let label = match reason {
                    ExitReason::StopLoss => "Stop loss hit",
                    ExitReason::TakeProfit => "Take profit hit",
                    ExitReason::BearishSignal => "Bearish crossover",
                };
                tracing::info!(
                    bot_id = %self.id,
                    quantity = execution.quantity,
                    %reason,
                    "{label}, selling {} at {}",
                    self.symbol,
                    execution.price
                );
            }
            Action::Hold => {}
        }
    }
}
