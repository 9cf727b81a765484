// In app/src/main.rs

use analytics::engine::AnalyticsEngine;
use anyhow::{Context, Result};
use app_config::Settings;
use backtester::{Backtester, RunWindow, VecDataFeed, print_report};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use engine::Bot;
use execution::SimulatedExecutor;
use risk::SimplePositionManager;
use rust_decimal::Decimal;
use std::path::PathBuf;
use strategies::MACrossover;
use tracing_subscriber::prelude::*;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "A daily moving-average crossover strategy with stop-loss and take-profit exits."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs a historical backtest over a `date,close` CSV file.
    Backtest {
        /// Path to the price data.
        #[arg(short, long)]
        data: PathBuf,

        /// Settings file to use instead of the layered `config/` directory.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overrides `run.symbol`.
        #[arg(short, long)]
        symbol: Option<String>,

        /// Overrides `run.start_date` (YYYY-MM-DD).
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Overrides `run.end_date` (YYYY-MM-DD).
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Print the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Computes the Sharpe ratio and total return of a daily value series.
    Summarize {
        /// Comma-separated portfolio values, oldest first.
        #[arg(long, value_delimiter = ',', required = true)]
        values: Vec<Decimal>,

        #[arg(long, default_value_t = 0.01)]
        risk_free_rate: f64,

        #[arg(long, default_value_t = 252)]
        periods_per_year: u32,

        #[arg(long)]
        json: bool,
    },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    match cli.command {
        Commands::Backtest {
            data,
            config,
            symbol,
            start_date,
            end_date,
            json,
        } => {
            let mut settings = match config {
                Some(path) => app_config::load_settings_from(&path)
                    .with_context(|| format!("Failed to load settings from {}", path.display()))?,
                None => app_config::load_settings().context("Failed to load settings")?,
            };
            init_tracing(&settings.app.log_level);

            if let Some(symbol) = symbol {
                settings.run.symbol = symbol;
            }
            if let Some(start_date) = start_date {
                settings.run.start_date = start_date;
            }
            if let Some(end_date) = end_date {
                settings.run.end_date = end_date;
            }
            settings.validate()?;

            handle_backtest(&settings, data, json)?;
        }
        Commands::Summarize {
            values,
            risk_free_rate,
            periods_per_year,
            json,
        } => {
            init_tracing("info");
            handle_summarize(&values, risk_free_rate, periods_per_year, json)?;
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

// --- "Backtest" Subcommand Logic ---

fn handle_backtest(settings: &Settings, data: PathBuf, json: bool) -> Result<()> {
    let symbol = settings.run.symbol();
    tracing::info!(%symbol, resolution = ?settings.run.resolution, "Settings loaded.");

    // --- 1. Instantiate All Components ---
    let generator = MACrossover::new(settings.strategy.clone())?;
    tracing::info!(
        fast_period = generator.settings().fast_period,
        slow_period = generator.settings().slow_period,
        warmup_bars = generator.settings().warmup_bars(),
        "Signal generator configured."
    );
    let manager = SimplePositionManager::new(settings.risk.clone())?;
    let bot = Bot::new(symbol.clone(), Box::new(generator), Box::new(manager));

    let host = SimulatedExecutor::new(
        settings.simulation.clone(),
        symbol.clone(),
        settings.run.starting_cash,
    )?;
    let window = RunWindow::new(settings.run.start_date, settings.run.end_date)?;
    let analytics = AnalyticsEngine::new(
        settings.analytics.annual_risk_free_rate,
        settings.analytics.trading_days_per_year,
    );

    // --- 2. Load Data ---
    let mut feed = VecDataFeed::from_csv_path(symbol, &data)
        .with_context(|| format!("Failed to load price data from {}", data.display()))?;

    // --- 3. Setup and Run the Backtester ---
    let mut backtester = Backtester::new(bot, host, window, analytics);
    let result = backtester.run(&mut feed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.report)?);
    } else {
        print_report(&result.report);
    }
    Ok(())
}

// --- "Summarize" Subcommand Logic ---

fn handle_summarize(
    values: &[Decimal],
    risk_free_rate: f64,
    periods_per_year: u32,
    json: bool,
) -> Result<()> {
    if periods_per_year == 0 {
        anyhow::bail!("--periods-per-year must be at least 1");
    }
    let summary = analytics::summarize(values, risk_free_rate, periods_per_year);
    tracing::info!(
        sharpe_ratio = summary.sharpe_ratio,
        total_return_pct = summary.total_return_percentage(),
        "Summary computed."
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Sharpe Ratio:  {:.4}", summary.sharpe_ratio);
        println!("Total Return:  {:.2}%", summary.total_return_percentage());
    }
    Ok(())
}
