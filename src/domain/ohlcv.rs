//! Daily OHLCV observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// Checks the per-observation invariants: finite positive prices and
    /// non-negative volume. Returns a human readable reason on failure.
    pub fn check(&self) -> Result<(), String> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!(
                    "{} on {} must be a positive number, got {}",
                    field, self.date, value
                ));
            }
        }
        if self.volume < 0 {
            return Err(format!(
                "volume on {} must be non-negative, got {}",
                self.date, self.volume
            ));
        }
        Ok(())
    }

    /// close / prev_close - 1
    pub fn pct_change(&self, prev_close: f64) -> f64 {
        self.close / prev_close - 1.0
    }
}
