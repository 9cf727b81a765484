// In crates/risk/src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SimpleRiskSettings {
    /// Exit when the close falls this fraction below the entry price (0.05 = 5%).
    pub stop_loss_percent: f64,
    /// Exit when the close rises this fraction above the entry price (0.10 = 10%).
    pub take_profit_percent: f64,
}

impl Default for SimpleRiskSettings {
    fn default() -> Self {
        Self {
            stop_loss_percent: 0.05,
            take_profit_percent: 0.10,
        }
    }
}
