// In crates/strategies/src/moving_average.rs

use crate::{Error, Result};
use ta::Next;
use ta::indicators::SimpleMovingAverage as Sma;

/// A simple moving average that knows when it has seen enough data.
///
/// The underlying `ta` indicator emits a partial mean from the first input; this
/// wrapper withholds the value until `period` observations have been fed.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    period: usize,
    sma: Sma,
    observed: usize,
    current: f64,
}

impl MovingAverage {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(Error::InvalidParameters(
                "Moving average period must be greater than 0.".to_string(),
            ));
        }
        let sma = Sma::new(period).map_err(|e| {
            Error::InvalidParameters(format!("Cannot build SMA({period}): {e:?}"))
        })?;

        Ok(Self {
            period,
            sma,
            observed: 0,
            current: 0.0,
        })
    }

    pub fn update(&mut self, value: f64) {
        self.current = self.sma.next(value);
        self.observed += 1;
    }

    pub fn is_ready(&self) -> bool {
        self.observed >= self.period
    }

    /// The current mean, or `None` until `period` values have been observed.
    pub fn value(&self) -> Option<f64> {
        self.is_ready().then_some(self.current)
    }
}
