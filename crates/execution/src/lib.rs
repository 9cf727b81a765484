// In crates/execution/src/lib.rs

use chrono::{DateTime, Utc};
use core_types::{Execution, Symbol};
use rust_decimal::Decimal;

pub mod error;
pub mod simulated;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use simulated::SimulatedExecutor;
pub use types::{Portfolio, SimulationSettings};

/// The order-execution side of the host.
///
/// Both operations fill at the observed close of the bar being evaluated.
pub trait Executor {
    /// The name of the executor (e.g., "SimulatedExecutor").
    fn name(&self) -> &'static str;

    /// Allocates 100% of available equity to a long position in `symbol`.
    fn enter_full_long(
        &mut self,
        symbol: &Symbol,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Execution>;

    /// Closes the whole position in `symbol`.
    fn liquidate(
        &mut self,
        symbol: &Symbol,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Execution>;
}

/// Read-only portfolio accounting exposed by the host.
pub trait PortfolioAccounting {
    /// Signed share quantity held in `symbol`; zero when flat or unknown.
    fn holdings(&self, symbol: &Symbol) -> i64;

    /// Cash plus the marked value of every position.
    fn total_value(&self) -> Decimal;
}
