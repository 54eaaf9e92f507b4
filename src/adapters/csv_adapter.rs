//! CSV file data adapter.
//!
//! One file per instrument, `<base>/<instrument>.csv`, with the header
//! `date,open,high,low,close,volume`.

use crate::domain::error::TradeBossError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, instrument: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", instrument))
    }
}

fn data_error(reason: String) -> TradeBossError {
    TradeBossError::Data { reason }
}

fn field<T>(record: &StringRecord, index: usize, name: &str, line: u64) -> Result<T, TradeBossError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = record
        .get(index)
        .ok_or_else(|| data_error(format!("line {}: missing {} column", line, name)))?;
    raw.trim()
        .parse()
        .map_err(|e| data_error(format!("line {}: invalid {} value '{}': {}", line, name, raw, e)))
}

fn parse_bar(record: &StringRecord) -> Result<OhlcvBar, TradeBossError> {
    let line = record.position().map_or(0, |p| p.line());
    let date_str: String = field(record, 0, "date", line)?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|e| data_error(format!("line {}: invalid date format: {}", line, e)))?;

    Ok(OhlcvBar {
        date,
        open: field(record, 1, "open", line)?,
        high: field(record, 2, "high", line)?,
        low: field(record, 3, "low", line)?,
        close: field(record, 4, "close", line)?,
        volume: field(record, 5, "volume", line)?,
    })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        instrument: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, TradeBossError> {
        let path = self.csv_path(instrument);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;
            let bar = parse_bar(&record)?;

            if start_date.is_some_and(|s| bar.date < s) || end_date.is_some_and(|e| bar.date > e) {
                continue;
            }
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.date);
        tracing::debug!(instrument, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_instruments(&self) -> Result<Vec<String>, TradeBossError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut instruments = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_error(format!("directory entry error: {}", e)))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    instruments.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        instruments.sort();
        Ok(instruments)
    }
}
