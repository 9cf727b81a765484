// In crates/core-types/src/types.rs

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tradable instrument identifier (e.g., "TSLA").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol(value.to_string())
    }
}

/// The bar resolution of a run. Only daily bars are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    #[default]
    Daily,
}

/// One periodic price observation for the tracked instrument.
///
/// `close` is `None` when the feed had no data for this interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub close: Option<Decimal>,
}

impl PriceBar {
    pub fn new(timestamp: DateTime<Utc>, close: Decimal) -> Self {
        Self {
            timestamp,
            close: Some(close),
        }
    }

    /// A bar for an interval where the feed delivered nothing.
    pub fn missing(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            close: None,
        }
    }

    /// Returns the close price if it is present and strictly positive.
    pub fn valid_close(&self) -> Result<Decimal> {
        match self.close {
            None => Err(Error::MissingPrice {
                timestamp: self.timestamp,
            }),
            Some(price) if price <= Decimal::ZERO => Err(Error::InvalidPrice {
                timestamp: self.timestamp,
                price,
            }),
            Some(price) => Ok(price),
        }
    }
}

/// Level-based crossover signal produced by comparing the fast and slow averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Signal {
    /// Fast average above slow average (golden cross regime).
    Bullish,
    /// Fast average below slow average (death cross regime).
    Bearish,
    /// Averages equal, or not ready yet.
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    BearishSignal,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExitReason::StopLoss => "stop-loss",
            ExitReason::TakeProfit => "take-profit",
            ExitReason::BearishSignal => "bearish signal",
        };
        f.write_str(label)
    }
}

/// The single order action the position manager emits for a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Allocate 100% of equity to a long position.
    EnterLong,
    /// Liquidate the whole position.
    Exit(ExitReason),
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// A filled order as reported by the execution host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub symbol: Symbol,
    pub side: Side,
    pub price: Decimal,
    pub quantity: i64,
    pub fee: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// The strategy's view of its own position.
///
/// Invariant: `entry_price.is_some()` if and only if `holdings > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionState {
    pub holdings: i64,
    pub entry_price: Option<Decimal>,
}

impl PositionState {
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn is_long(&self) -> bool {
        self.holdings > 0
    }

    /// Whether the entry-price invariant holds for this state.
    pub fn is_consistent(&self) -> bool {
        self.is_long() == self.entry_price.is_some()
    }

    /// Applies an executed action. `holdings_after` is the quantity the host reports
    /// once the order has been processed.
    pub fn apply(&mut self, action: Action, close: Decimal, holdings_after: i64) {
        match action {
            Action::EnterLong => {
                self.holdings = holdings_after;
                self.entry_price = (holdings_after > 0).then_some(close);
            }
            Action::Exit(_) => {
                self.holdings = holdings_after;
                if holdings_after <= 0 {
                    self.entry_price = None;
                }
            }
            Action::Hold => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 1, 2, 0, 0, 0).unwrap()
    }

    #[test]
    fn valid_close_accepts_positive_prices() {
        let bar = PriceBar::new(ts(), dec!(101.5));
        assert_eq!(bar.valid_close(), Ok(dec!(101.5)));
    }

    #[test]
    fn valid_close_rejects_missing_and_non_positive() {
        assert_eq!(
            PriceBar::missing(ts()).valid_close(),
            Err(Error::MissingPrice { timestamp: ts() })
        );
        assert!(matches!(
            PriceBar::new(ts(), dec!(0)).valid_close(),
            Err(Error::InvalidPrice { .. })
        ));
        assert!(matches!(
            PriceBar::new(ts(), dec!(-3)).valid_close(),
            Err(Error::InvalidPrice { .. })
        ));
    }

    #[test]
    fn entering_sets_entry_price_only_when_filled() {
        let mut position = PositionState::flat();
        position.apply(Action::EnterLong, dec!(100), 0);
        assert_eq!(position, PositionState::flat());

        position.apply(Action::EnterLong, dec!(100), 42);
        assert_eq!(position.holdings, 42);
        assert_eq!(position.entry_price, Some(dec!(100)));
        assert!(position.is_consistent());
    }

    #[test]
    fn exiting_clears_entry_price() {
        let mut position = PositionState {
            holdings: 10,
            entry_price: Some(dec!(100)),
        };
        position.apply(Action::Exit(ExitReason::StopLoss), dec!(94), 0);
        assert_eq!(position, PositionState::flat());
    }

    #[test]
    fn hold_leaves_state_untouched() {
        let mut position = PositionState {
            holdings: 10,
            entry_price: Some(dec!(100)),
        };
        let before = position;
        position.apply(Action::Hold, dec!(250), 0);
        assert_eq!(position, before);
    }

    #[test]
    fn exit_reason_labels() {
        assert_eq!(ExitReason::StopLoss.to_string(), "stop-loss");
        assert_eq!(ExitReason::TakeProfit.to_string(), "take-profit");
        assert_eq!(ExitReason::BearishSignal.to_string(), "bearish signal");
    }
}
