// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MACrossoverSettings {
    pub fast_period: u32,
    pub slow_period: u32,

    /// Bars consumed before any signal is tradable. Defaults to `slow_period`.
    #[serde(default)]
    pub warmup_bars: Option<u32>,
}

impl MACrossoverSettings {
    pub fn warmup_bars(&self) -> u32 {
        self.warmup_bars.unwrap_or(self.slow_period)
    }
}

impl Default for MACrossoverSettings {
    fn default() -> Self {
        Self {
            fast_period: 50,
            slow_period: 200,
            warmup_bars: None,
        }
    }
}
