//! Validated OHLCV series for one instrument.
//!
//! A `Series` is the only input the agents accept. Construction enforces the
//! ordering and value invariants, so agents never re-check them.

use crate::domain::error::TradeBossError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Series {
    instrument: String,
    bars: Vec<OhlcvBar>,
}

impl Series {
    /// Builds a series, rejecting empty input, non-increasing dates and
    /// malformed observations.
    pub fn new(instrument: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self, TradeBossError> {
        let instrument = instrument.into();
        let invalid = |reason: String| TradeBossError::InvalidSeries {
            series: instrument.clone(),
            reason,
        };

        if bars.is_empty() {
            return Err(invalid("series has no observations".to_string()));
        }

        for (i, bar) in bars.iter().enumerate() {
            bar.check().map_err(invalid)?;
            if i > 0 {
                let prev = bars[i - 1].date;
                if bar.date == prev {
                    return Err(invalid(format!("duplicate date {}", bar.date)));
                }
                if bar.date < prev {
                    return Err(invalid(format!(
                        "dates out of order: {} follows {}",
                        bar.date, prev
                    )));
                }
            }
        }

        Ok(Self { instrument, bars })
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; present for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> &OhlcvBar {
        // Non-empty by construction.
        &self.bars[self.bars.len() - 1]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// Close-to-close percentage change. The first observation has no
    /// predecessor, so the result holds `len() - 1` values.
    pub fn daily_returns(&self) -> Vec<f64> {
        self.bars
            .windows(2)
            .map(|pair| pair[1].pct_change(pair[0].close))
            .collect()
    }

    /// Prefix of the series ending at `as_of` (inclusive).
    pub fn up_to(&self, as_of: NaiveDate) -> Result<Series, TradeBossError> {
        let bars: Vec<OhlcvBar> = self
            .bars
            .iter()
            .take_while(|b| b.date <= as_of)
            .cloned()
            .collect();
        Series::new(self.instrument.clone(), bars)
    }

    /// Observations strictly after `date`.
    pub fn after(&self, date: NaiveDate) -> &[OhlcvBar] {
        let start = self.bars.partition_point(|b| b.date <= date);
        &self.bars[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(date: &str, close: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000,
        }
    }

    fn sample_series() -> Series {
        Series::new(
            "BHP",
            vec![
                make_bar("2024-01-01", 100.0),
                make_bar("2024-01-02", 110.0),
                make_bar("2024-01-03", 99.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn keeps_bars_in_order() {
        let series = sample_series();
        assert_eq!(series.len(), 3);
        assert_eq!(series.instrument(), "BHP");
        assert_eq!(series.last().close, 99.0);
    }

    #[test]
    fn empty_series_rejected() {
        let err = Series::new("BHP", vec![]).unwrap_err();
        assert!(matches!(err, TradeBossError::InvalidSeries { ref series, .. } if series == "BHP"));
    }

    #[test]
    fn duplicate_date_rejected() {
        let err = Series::new(
            "BHP",
            vec![make_bar("2024-01-01", 100.0), make_bar("2024-01-01", 101.0)],
        )
        .unwrap_err();
        match err {
            TradeBossError::InvalidSeries { reason, .. } => {
                assert_eq!(reason, "duplicate date 2024-01-01")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_of_order_rejected() {
        let err = Series::new(
            "BHP",
            vec![make_bar("2024-01-02", 100.0), make_bar("2024-01-01", 101.0)],
        )
        .unwrap_err();
        assert!(matches!(err, TradeBossError::InvalidSeries { .. }));
    }

    #[test]
    fn malformed_bar_rejected() {
        let mut bad = make_bar("2024-01-02", 100.0);
        bad.close = -5.0;
        let err = Series::new("BHP", vec![make_bar("2024-01-01", 100.0), bad]).unwrap_err();
        assert!(matches!(err, TradeBossError::InvalidSeries { .. }));
    }

    #[test]
    fn projections() {
        let series = sample_series();
        assert_eq!(series.closes(), vec![100.0, 110.0, 99.0]);
        assert_eq!(series.highs(), vec![101.0, 111.0, 100.0]);
        assert_eq!(series.lows(), vec![98.0, 108.0, 97.0]);
        assert_eq!(series.volumes(), vec![1000.0, 1000.0, 1000.0]);
        assert!((series.last().close - 99.0).abs() < f64::EPSILON);
    }

    #[test]
    fn daily_returns_drop_first_observation() {
        let returns = sample_series().daily_returns();
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn up_to_and_after_split_on_date() {
        let series = sample_series();
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let prefix = series.up_to(as_of).unwrap();
        assert_eq!(prefix.len(), 2);
        assert_eq!(prefix.instrument(), "BHP");

        let rest = series.after(as_of);
        assert_eq!(rest.len(), 1);
        assert!((rest[0].close - 99.0).abs() < f64::EPSILON);
    }

    #[test]
    fn up_to_before_first_date_is_invalid() {
        let series = sample_series();
        let err = series
            .up_to(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
            .unwrap_err();
        assert!(matches!(err, TradeBossError::InvalidSeries { .. }));
    }
}
