// In crates/app-config/src/types.rs

use crate::{Error, Result};
use chrono::NaiveDate;
use core_types::{Resolution, Symbol};
use execution::types::SimulationSettings;
use risk::types::SimpleRiskSettings;
use rust_decimal::Decimal;
use serde::Deserialize;
use strategies::types::MACrossoverSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// What to trade and over which window.
    pub run: RunSettings,
    #[serde(default)]
    pub strategy: MACrossoverSettings,
    #[serde(default)]
    pub risk: SimpleRiskSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct RunSettings {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub starting_cash: Decimal,
    #[serde(default)]
    pub resolution: Resolution,
}

impl RunSettings {
    pub fn symbol(&self) -> Symbol {
        Symbol(self.symbol.clone())
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AnalyticsSettings {
    pub annual_risk_free_rate: f64,
    pub trading_days_per_year: u32,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            annual_risk_free_rate: 0.01,
            trading_days_per_year: 252,
        }
    }
}

impl Settings {
    /// Rejects settings the run could not start with.
    pub fn validate(&self) -> Result<()> {
        let strategy = &self.strategy;
        if strategy.fast_period == 0 || strategy.slow_period == 0 {
            return invalid("strategy periods must be at least 1");
        }
        if strategy.fast_period >= strategy.slow_period {
            return invalid(format!(
                "fast_period ({}) must be below slow_period ({})",
                strategy.fast_period, strategy.slow_period
            ));
        }

        let risk = &self.risk;
        if !(0.0..1.0).contains(&risk.stop_loss_percent) {
            return invalid(format!(
                "stop_loss_percent must be in [0, 1), got {}",
                risk.stop_loss_percent
            ));
        }
        if !risk.take_profit_percent.is_finite() || risk.take_profit_percent < 0.0 {
            return invalid(format!(
                "take_profit_percent must be non-negative, got {}",
                risk.take_profit_percent
            ));
        }

        let run = &self.run;
        if run.symbol.trim().is_empty() {
            return invalid("run.symbol must not be empty");
        }
        if run.starting_cash <= Decimal::ZERO {
            return invalid(format!(
                "starting_cash must be positive, got {}",
                run.starting_cash
            ));
        }
        if run.start_date > run.end_date {
            return invalid(format!(
                "start_date {} is after end_date {}",
                run.start_date, run.end_date
            ));
        }

        let simulation = &self.simulation;
        if simulation.taker_fee < 0.0 || simulation.slippage_percent < 0.0 {
            return invalid("fees and slippage must be non-negative");
        }

        if self.analytics.trading_days_per_year == 0 {
            return invalid("trading_days_per_year must be at least 1");
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> Result<()> {
    Err(Error::Invalid(message.into()))
}
