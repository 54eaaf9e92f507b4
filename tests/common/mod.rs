#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;
use tradeboss::domain::error::TradeBossError;
pub use tradeboss::domain::ohlcv::OhlcvBar;
use tradeboss::domain::recommendation::{Action, Recommendation};
use tradeboss::domain::series::Series;
use tradeboss::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, instrument: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(instrument.to_string(), bars);
        self
    }

    pub fn with_error(mut self, instrument: &str, reason: &str) -> Self {
        self.errors.insert(instrument.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        instrument: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, TradeBossError> {
        if let Some(reason) = self.errors.get(instrument) {
            return Err(TradeBossError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(instrument)
            .map(|bars| {
                bars.iter()
                    .filter(|b| start_date.is_none_or(|s| b.date >= s))
                    .filter(|b| end_date.is_none_or(|e| b.date <= e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_instruments(&self) -> Result<Vec<String>, TradeBossError> {
        let mut names: Vec<String> = self.data.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Flat bar: open, high and low equal the close.
pub fn make_bar(date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1000,
    }
}

/// One flat bar per calendar day starting 2024-01-01.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn series_from_closes(instrument: &str, closes: &[f64]) -> Series {
    Series::new(instrument, bars_from_closes(closes)).unwrap()
}

/// `start * (1 + rate)^i` for `i in 0..count`.
pub fn geometric(start: f64, rate: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start * (1.0 + rate).powi(i as i32)).collect()
}

/// Bars with a trading range around each close.
pub fn generate_bars(start_date: &str, closes: &[f64], spread_pct: f64) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close * (1.0 + spread_pct),
            low: close * (1.0 - spread_pct),
            close,
            volume: 1000 + i as i64,
        })
        .collect()
}

pub fn write_csv(dir: &Path, instrument: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", instrument)), content).unwrap();
}

pub fn recommendation(name: &str, action: Action, confidence: f64) -> Recommendation {
    Recommendation::new(name, action, confidence, 0.5, 0.0)
}
