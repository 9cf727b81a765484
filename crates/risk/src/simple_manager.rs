// In crates/risk/src/simple_manager.rs

use crate::types::SimpleRiskSettings;
use crate::{Error, PositionManager, Result};
use core_types::{Action, ExitReason, PositionState, Signal};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;

/// Long-only, full-allocation position manager with fixed stop-loss and take-profit.
///
/// Rules are evaluated in order and the first match wins:
/// 1. Stop-loss: long, and close is below `entry * (1 - stop_loss)`.
/// 2. Take-profit: long, and close is above `entry * (1 + take_profit)`.
/// 3. Enter long on a bullish signal when flat.
/// 4. Exit on a bearish signal when long.
/// 5. Otherwise hold.
#[derive(Debug, Clone)]
pub struct SimplePositionManager {
    /// Thresholds as fractions of the entry price.
    stop_loss: Decimal,
    take_profit: Decimal,
}

impl SimplePositionManager {
    /// Creates a new `SimplePositionManager`, rejecting out-of-range thresholds.
    pub fn new(settings: SimpleRiskSettings) -> Result<Self> {
        let stop_loss = to_fraction("stop_loss_percent", settings.stop_loss_percent)?;
        let take_profit = to_fraction("take_profit_percent", settings.take_profit_percent)?;
        if stop_loss >= Decimal::ONE {
            return Err(Error::InvalidParameters(format!(
                "stop_loss_percent ({}) must be below 1.0",
                settings.stop_loss_percent
            )));
        }

        Ok(Self {
            stop_loss,
            take_profit,
        })
    }

    /// The close below which a long position is stopped out.
    pub fn stop_price(&self, entry_price: Decimal) -> Decimal {
        entry_price * (Decimal::ONE - self.stop_loss)
    }

    /// The close above which a long position takes profit.
    pub fn target_price(&self, entry_price: Decimal) -> Decimal {
        entry_price * (Decimal::ONE + self.take_profit)
    }
}

fn to_fraction(name: &str, value: f64) -> Result<Decimal> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidParameters(format!(
            "{name} must be a non-negative fraction, got {value}"
        )));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| Error::InvalidParameters(format!("{name} is out of range: {value}")))
}

impl PositionManager for SimplePositionManager {
    fn name(&self) -> &'static str {
        "SimplePositionManager"
    }

    fn decide(&self, signal: Signal, close: Decimal, position: &PositionState) -> Action {
        // --- Risk exits take precedence over the signal ---
        if position.is_long() {
            if let Some(entry_price) = position.entry_price {
                if close < self.stop_price(entry_price) {
                    tracing::debug!(%close, %entry_price, "Stop-loss threshold crossed.");
                    return Action::Exit(ExitReason::StopLoss);
                }
                if close > self.target_price(entry_price) {
                    tracing::debug!(%close, %entry_price, "Take-profit threshold crossed.");
                    return Action::Exit(ExitReason::TakeProfit);
                }
            }
        }

        // --- Signal-driven entries and exits ---
        match signal {
            Signal::Bullish if position.holdings <= 0 => Action::EnterLong,
            Signal::Bearish if position.holdings > 0 => Action::Exit(ExitReason::BearishSignal),
            _ => Action::Hold,
        }
    }
}
