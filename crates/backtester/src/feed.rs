// In crates/backtester/src/feed.rs

use crate::Result;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{PriceBar, Symbol};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// The host data feed: bars for one instrument, in increasing timestamp order.
pub trait DataFeed {
    fn symbol(&self) -> &Symbol;

    /// The next bar, or `None` once the feed is exhausted.
    fn next_bar(&mut self) -> Option<PriceBar>;
}

/// A feed over bars already held in memory.
#[derive(Debug, Clone)]
pub struct VecDataFeed {
    symbol: Symbol,
    bars: std::collections::VecDeque<PriceBar>,
}

impl VecDataFeed {
    pub fn new(symbol: Symbol, bars: Vec<PriceBar>) -> Self {
        Self {
            symbol,
            bars: bars.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Loads a `date,close` CSV file.
    pub fn from_csv_path(symbol: Symbol, path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(symbol, file)
    }

    /// Loads `date,close` CSV rows from any reader.
    ///
    /// A row whose close is blank or unparseable becomes a bar without a price. Rows
    /// with an unparseable date, or not strictly after the previous row, are dropped.
    pub fn from_csv_reader<R: Read>(symbol: Symbol, reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut bars: Vec<PriceBar> = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(error) => {
                    tracing::warn!(%symbol, line = line + 2, %error, "Skipping malformed CSV row.");
                    continue;
                }
            };
            let Some(timestamp) = parse_timestamp(&row.date) else {
                tracing::warn!(%symbol, line = line + 2, date = %row.date, "Skipping row with unparseable date.");
                continue;
            };
            if let Some(previous) = bars.last() {
                if timestamp <= previous.timestamp {
                    tracing::warn!(%symbol, %timestamp, "Skipping out-of-order row.");
                    continue;
                }
            }
            let close = row
                .close
                .as_deref()
                .and_then(|raw| Decimal::from_str(raw).ok());
            bars.push(PriceBar { timestamp, close });
        }

        tracing::info!(%symbol, bars = bars.len(), "Loaded price data.");
        Ok(Self::new(symbol, bars))
    }
}

impl DataFeed for VecDataFeed {
    fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    fn next_bar(&mut self) -> Option<PriceBar> {
        self.bars.pop_front()
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    #[serde(default)]
    close: Option<String>,
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or RFC 3339 timestamps.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
