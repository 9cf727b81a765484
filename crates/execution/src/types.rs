// In crates/execution/src/types.rs

use core_types::Symbol;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SimulationSettings {
    /// The taker fee charged on every fill (e.g., 0.0004 for 0.04%).
    #[serde(default)]
    pub taker_fee: f64,

    /// The simulated slippage percentage for market orders (e.g., 0.0005 for 0.05%).
    #[serde(default)]
    pub slippage_percent: f64,
}

/// Represents the state of the simulated single-symbol portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub symbol: Symbol,
    /// The cash balance of the portfolio.
    pub cash: Decimal,
    /// Whole shares held; never negative since shorts are not used.
    pub quantity: i64,
    /// The last valid close, used to mark the position.
    pub last_price: Option<Decimal>,
}

impl Portfolio {
    /// Creates a new, flat portfolio with an initial cash balance.
    pub fn new(symbol: Symbol, initial_cash: Decimal) -> Self {
        Self {
            symbol,
            cash: initial_cash,
            quantity: 0,
            last_price: None,
        }
    }

    pub fn position_value(&self) -> Decimal {
        match self.last_price {
            Some(price) => price * Decimal::from(self.quantity),
            None => Decimal::ZERO,
        }
    }

    pub fn total_value(&self) -> Decimal {
        self.cash + self.position_value()
    }
}
