// In crates/execution/src/simulated.rs

use crate::types::{Portfolio, SimulationSettings};
use crate::{Error, Executor, PortfolioAccounting, Result};
use chrono::{DateTime, Utc};
use core_types::{Execution, Side, Symbol};
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// An in-memory backtest host for a single symbol.
///
/// Fills happen at the given close, adjusted by slippage, with a proportional taker fee.
/// Positions are whole shares.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    settings: SimulationSettings,
    fee_rate: Decimal,
    slippage: Decimal,
    portfolio: Portfolio,
}

impl SimulatedExecutor {
    pub fn new(
        settings: SimulationSettings,
        symbol: Symbol,
        initial_cash: Decimal,
    ) -> Result<Self> {
        let fee_rate = to_rate("taker_fee", settings.taker_fee)?;
        let slippage = to_rate("slippage_percent", settings.slippage_percent)?;
        if initial_cash <= Decimal::ZERO {
            return Err(Error::InvalidSettings(format!(
                "initial cash must be positive, got {initial_cash}"
            )));
        }

        Ok(Self {
            settings,
            fee_rate,
            slippage,
            portfolio: Portfolio::new(symbol, initial_cash),
        })
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Marks the open position to a new valid close.
    pub fn mark(&mut self, price: Decimal) {
        self.portfolio.last_price = Some(price);
    }

    fn ensure_symbol(&self, symbol: &Symbol) -> Result<()> {
        if *symbol != self.portfolio.symbol {
            return Err(Error::UnknownSymbol {
                symbol: symbol.0.clone(),
            });
        }
        Ok(())
    }
}

fn to_rate(name: &str, value: f64) -> Result<Decimal> {
    if !value.is_finite() || !(0.0..1.0).contains(&value) {
        return Err(Error::InvalidSettings(format!(
            "{name} must be in [0, 1), got {value}"
        )));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| Error::InvalidSettings(format!("{name} is out of range: {value}")))
}

impl Executor for SimulatedExecutor {
    fn name(&self) -> &'static str {
        "SimulatedExecutor"
    }

    fn enter_full_long(
        &mut self,
        symbol: &Symbol,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Execution> {
        self.ensure_symbol(symbol)?;
        if self.portfolio.quantity > 0 {
            return Err(Error::ExecutionFailed {
                reason: format!("A position in {symbol} is already open"),
            });
        }
        if price <= Decimal::ZERO {
            return Err(Error::ExecutionFailed {
                reason: format!("Cannot fill at non-positive price {price}"),
            });
        }

        // --- 1. Calculate Execution Price with Slippage ---
        // For a long entry, slippage makes the price worse (higher).
        let execution_price = price * (Decimal::ONE + self.slippage);

        // --- 2. Size to all available cash, fees included ---
        let unit_cost = execution_price * (Decimal::ONE + self.fee_rate);
        let quantity = (self.portfolio.cash / unit_cost)
            .floor()
            .to_i64()
            .unwrap_or(0);
        if quantity <= 0 {
            return Err(Error::InsufficientFunds {
                cash: self.portfolio.cash,
                price: unit_cost,
            });
        }

        let notional = execution_price * Decimal::from(quantity);
        let fee = notional * self.fee_rate;

        // --- 3. Update Portfolio State ---
        self.portfolio.cash -= notional + fee;
        self.portfolio.quantity = quantity;
        self.portfolio.last_price = Some(price);

        tracing::debug!(%symbol, quantity, %execution_price, %fee, "Simulated entry filled.");

        Ok(Execution {
            symbol: symbol.clone(),
            side: Side::Buy,
            price: execution_price,
            quantity,
            fee,
            timestamp,
        })
    }

    fn liquidate(
        &mut self,
        symbol: &Symbol,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Execution> {
        self.ensure_symbol(symbol)?;
        let quantity = self.portfolio.quantity;
        if quantity <= 0 {
            return Err(Error::NoOpenPosition {
                symbol: symbol.0.clone(),
            });
        }

        // To close a long, we sell. Slippage makes the price worse (lower).
        let execution_price = price * (Decimal::ONE - self.slippage);
        let notional = execution_price * Decimal::from(quantity);
        let fee = notional * self.fee_rate;

        self.portfolio.cash += notional - fee;
        self.portfolio.quantity = 0;
        self.portfolio.last_price = Some(price);

        tracing::debug!(%symbol, quantity, %execution_price, %fee, "Simulated liquidation filled.");

        Ok(Execution {
            symbol: symbol.clone(),
            side: Side::Sell,
            price: execution_price,
            quantity,
            fee,
            timestamp,
        })
    }
}

impl PortfolioAccounting for SimulatedExecutor {
    fn holdings(&self, symbol: &Symbol) -> i64 {
        if *symbol == self.portfolio.symbol {
            self.portfolio.quantity
        } else {
            0
        }
    }

    fn total_value(&self) -> Decimal {
        self.portfolio.total_value()
    }
}
