// In crates/app-config/src/lib.rs

use config::{Config, Environment, File, FileFormat};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AnalyticsSettings, AppSettings, RunSettings, Settings};

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
///
/// The result is validated before it is returned.
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::with_name("config/base"))
        // 2. Load the environment-specific configuration file.
        .add_source(File::with_name(&format!("config/{}", environment)).required(false))
        // 3. Load settings from environment variables (e.g., `APP_RUN__SYMBOL=...`).
        .add_source(env_source())
        .build()?;

    finish(settings)
}

/// Loads settings from an explicit TOML file, still honouring environment overrides.
pub fn load_settings_from(path: impl AsRef<Path>) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    let settings = Config::builder()
        .add_source(File::from_str(&content, FileFormat::Toml))
        .add_source(env_source())
        .build()?;

    finish(settings)
}

// The prefix is `APP`, separator is `__`.
fn env_source() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn finish(config: Config) -> Result<Settings> {
    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
