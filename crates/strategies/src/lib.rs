// In crates/strategies/src/lib.rs

use core_types::Signal;
use rust_decimal::Decimal;

pub mod error;
pub mod ma_crossover;
pub mod moving_average;
pub mod types;

pub use error::{Error, Result};
pub use ma_crossover::MACrossover;
pub use moving_average::MovingAverage;
pub use types::MACrossoverSettings;

/// Current values of the two averages, `None` until each one is ready.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Averages {
    pub fast: Option<f64>,
    pub slow: Option<f64>,
}

/// The universal interface for a crossover signal generator.
///
/// A generator is fed one close price per bar, strictly forward in time, and exposes a
/// level-based signal derived from its current indicator state. It never sees the
/// portfolio.
pub trait SignalGenerator {
    /// The name of the generator.
    fn name(&self) -> &'static str;

    /// Feeds the close of a new bar into the indicators.
    fn update(&mut self, close: Decimal);

    /// Whether the warm-up is over and every indicator is ready.
    fn is_ready(&self) -> bool;

    /// The signal for the current indicator state. `Signal::Neutral` while not ready.
    fn crossover(&self) -> Signal;

    fn averages(&self) -> Averages;
}
