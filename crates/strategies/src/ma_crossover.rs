// In crates/strategies/src/ma_crossover.rs

use crate::moving_average::MovingAverage;
use crate::types::MACrossoverSettings;
use crate::{Averages, Error, Result, SignalGenerator};
use core_types::Signal;
use num_traits::cast::ToPrimitive;
use rust_decimal::Decimal;

/// Fast/slow simple moving average crossover.
///
/// The signal is a comparison of the current average values, not a crossing event:
/// while the fast average stays above the slow one, every bar reports `Bullish`.
#[derive(Debug, Clone)]
pub struct MACrossover {
    /// The configuration for this strategy instance.
    settings: MACrossoverSettings,
    fast: MovingAverage,
    slow: MovingAverage,
    /// Number of valid closes fed so far.
    bars_seen: usize,
}

impl MACrossover {
    /// Creates a new `MACrossover` from its settings, rejecting invalid periods.
    pub fn new(settings: MACrossoverSettings) -> Result<Self> {
        if settings.fast_period < 1 || settings.slow_period < 1 {
            return Err(Error::InvalidParameters(
                "Moving average periods must be greater than 0.".to_string(),
            ));
        }
        if settings.fast_period >= settings.slow_period {
            return Err(Error::InvalidParameters(format!(
                "Fast period ({}) must be shorter than slow period ({}).",
                settings.fast_period, settings.slow_period
            )));
        }

        Ok(Self {
            fast: MovingAverage::new(settings.fast_period as usize)?,
            slow: MovingAverage::new(settings.slow_period as usize)?,
            settings,
            bars_seen: 0,
        })
    }

    pub fn settings(&self) -> &MACrossoverSettings {
        &self.settings
    }

    /// True while the bars fed so far are still warm-up history.
    pub fn is_warming_up(&self) -> bool {
        self.bars_seen <= self.settings.warmup_bars() as usize
    }
}

impl SignalGenerator for MACrossover {
    fn name(&self) -> &'static str {
        "MACrossover"
    }

    fn update(&mut self, close: Decimal) {
        let Some(value) = close.to_f64() else {
            tracing::warn!(%close, "Close price is not representable as f64; ignoring.");
            return;
        };
        self.fast.update(value);
        self.slow.update(value);
        self.bars_seen += 1;
    }

    fn is_ready(&self) -> bool {
        !self.is_warming_up() && self.fast.is_ready() && self.slow.is_ready()
    }

    fn crossover(&self) -> Signal {
        if !self.is_ready() {
            return Signal::Neutral;
        }
        match (self.fast.value(), self.slow.value()) {
            (Some(fast), Some(slow)) if fast > slow => Signal::Bullish,
            (Some(fast), Some(slow)) if fast < slow => Signal::Bearish,
            _ => Signal::Neutral,
        }
    }

    fn averages(&self) -> Averages {
        Averages {
            fast: self.fast.value(),
            slow: self.slow.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn settings(fast: u32, slow: u32) -> MACrossoverSettings {
        MACrossoverSettings {
            fast_period: fast,
            slow_period: slow,
            warmup_bars: None,
        }
    }

    fn feed(generator: &mut MACrossover, closes: &[i64]) {
        for close in closes {
            generator.update(Decimal::from(*close));
        }
    }

    #[test]
    fn rejects_invalid_periods() {
        assert!(MACrossover::new(settings(0, 200)).is_err());
        assert!(MACrossover::new(settings(50, 0)).is_err());
        assert!(MACrossover::new(settings(200, 50)).is_err());
        assert!(MACrossover::new(settings(50, 50)).is_err());
    }

    #[test]
    fn neutral_during_warmup() {
        let mut generator = MACrossover::new(settings(2, 4)).unwrap();
        feed(&mut generator, &[1, 2, 3, 4]);
        // Both averages are ready but the fourth bar is still warm-up history.
        assert!(generator.averages().slow.is_some());
        assert!(!generator.is_ready());
        assert_eq!(generator.crossover(), Signal::Neutral);

        generator.update(dec!(5));
        assert!(generator.is_ready());
        assert_eq!(generator.crossover(), Signal::Bullish);
    }

    #[test]
    fn warmup_can_exceed_slow_period() {
        let mut generator = MACrossover::new(MACrossoverSettings {
            fast_period: 2,
            slow_period: 3,
            warmup_bars: Some(6),
        })
        .unwrap();
        feed(&mut generator, &[1, 2, 3, 4, 5, 6]);
        assert!(!generator.is_ready());
        generator.update(dec!(7));
        assert!(generator.is_ready());
    }

    #[test]
    fn signal_is_level_based() {
        let mut generator = MACrossover::new(settings(2, 4)).unwrap();
        feed(&mut generator, &[10, 10, 10, 10, 11]);
        assert_eq!(generator.crossover(), Signal::Bullish);
        // Same regime on the next bar: still bullish, no edge detection.
        generator.update(dec!(12));
        assert_eq!(generator.crossover(), Signal::Bullish);
    }

    #[test]
    fn bearish_when_fast_below_slow() {
        let mut generator = MACrossover::new(settings(2, 4)).unwrap();
        feed(&mut generator, &[20, 20, 20, 20, 15]);
        assert_eq!(generator.crossover(), Signal::Bearish);
    }

    #[test]
    fn neutral_when_averages_equal() {
        let mut generator = MACrossover::new(settings(2, 4)).unwrap();
        feed(&mut generator, &[100, 100, 100, 100, 100]);
        assert!(generator.is_ready());
        assert_eq!(generator.crossover(), Signal::Neutral);
    }

    #[test]
    fn default_settings_match_the_classic_pair() {
        let generator = MACrossover::new(MACrossoverSettings::default()).unwrap();
        assert_eq!(generator.settings().fast_period, 50);
        assert_eq!(generator.settings().slow_period, 200);
        assert_eq!(generator.settings().warmup_bars(), 200);
    }

    proptest! {
        #[test]
        fn never_ready_before_slow_period(closes in prop::collection::vec(1i64..10_000, 0..200)) {
            let mut generator = MACrossover::new(MACrossoverSettings::default()).unwrap();
            for close in &closes {
                generator.update(Decimal::from(*close));
                prop_assert!(!generator.is_ready());
                prop_assert_eq!(generator.crossover(), Signal::Neutral);
            }
        }
    }
}
