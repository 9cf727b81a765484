// In crates/risk/src/lib.rs

use core_types::{Action, PositionState, Signal};
use rust_decimal::Decimal;

pub mod error;
pub mod simple_manager;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use simple_manager::SimplePositionManager;
pub use types::SimpleRiskSettings;

/// The universal interface for a position manager.
///
/// A `PositionManager` turns the current signal, the validated close of the bar and the
/// strategy's own position into exactly one `Action`. It is a pure decision: applying
/// the action to the position is the caller's job once the host has executed it.
pub trait PositionManager {
    /// The name of the position management strategy.
    fn name(&self) -> &'static str;

    /// Decides the action for one bar.
    ///
    /// # Arguments
    ///
    /// * `signal`: The crossover `Signal` for this bar.
    /// * `close`: The bar's close price, already checked to be present and positive.
    /// * `position`: The strategy's current `PositionState`.
    fn decide(&self, signal: Signal, close: Decimal, position: &PositionState) -> Action;
}
