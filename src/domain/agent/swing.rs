//! Swing trading agent.
//!
//! Trades breaks of the recent trading range:
//! support = MIN(low, w), resistance = MAX(high, w) over the last w bars.
//! close < support -> BUY, close > resistance -> SELL, otherwise HOLD at
//! fixed confidence 0.5, risk 0.5 and zero expected return.
//!
//! For breaks, confidence and risk are taken over the whole series:
//! confidence = min(1, (STDDEV(close) + STDDEV(volume)) / 2)
//! risk       = min(1, STDDEV(daily return) * 10)
//! expected   = MEAN(last `lookback_period` daily returns) * 100, negated for SELL

use crate::domain::agent::{defined, ensure_bars, TradingAgent, SWING};
use crate::domain::error::TradeBossError;
use crate::domain::indicator::extrema::{rolling_max, rolling_min};
use crate::domain::recommendation::{Action, Recommendation};
use crate::domain::series::Series;
use crate::domain::stats;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingParams {
    pub lookback_period: usize,
    pub support_resistance_window: usize,
}

impl Default for SwingParams {
    fn default() -> Self {
        Self {
            lookback_period: 14,
            support_resistance_window: 5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SwingAgent {
    params: SwingParams,
}

impl SwingAgent {
    pub fn new(params: SwingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SwingParams {
        &self.params
    }

    fn stddev(&self, values: &[f64], series: &Series) -> Result<f64, TradeBossError> {
        defined(stats::sample_stddev(values), self, series)
    }
}

impl TradingAgent for SwingAgent {
    fn name(&self) -> &str {
        SWING
    }

    fn required_bars(&self) -> usize {
        // Three closes give the two returns a sample stddev needs.
        self.params.support_resistance_window.max(3)
    }

    fn confidence_score(&self, series: &Series) -> Result<f64, TradeBossError> {
        ensure_bars(self, series)?;
        let price_std = self.stddev(&series.closes(), series)?;
        let volume_std = self.stddev(&series.volumes(), series)?;
        Ok(((price_std + volume_std) / 2.0).min(1.0))
    }

    fn risk_level(&self, series: &Series) -> Result<f64, TradeBossError> {
        ensure_bars(self, series)?;
        let volatility = self.stddev(&series.daily_returns(), series)?;
        Ok((volatility * 10.0).min(1.0))
    }

    fn expected_return(&self, series: &Series) -> Result<f64, TradeBossError> {
        ensure_bars(self, series)?;
        let returns = series.daily_returns();
        let recent = stats::tail(&returns, self.params.lookback_period);
        Ok(stats::mean(recent) * 100.0)
    }

    fn generate_recommendation(&self, series: &Series) -> Result<Recommendation, TradeBossError> {
        ensure_bars(self, series)?;

        let window = self.params.support_resistance_window;
        let support = defined(rolling_min(&series.lows(), window).last_valid(), self, series)?;
        let resistance = defined(rolling_max(&series.highs(), window).last_valid(), self, series)?;
        let price = series.last().close;

        let recommendation = if price < support {
            Recommendation::new(
                SWING,
                Action::Buy,
                self.confidence_score(series)?,
                self.risk_level(series)?,
                self.expected_return(series)?,
            )
            .with_reasoning(format!(
                "close {:.2} broke below {}-bar support {:.2}",
                price, window, support
            ))
        } else if price > resistance {
            Recommendation::new(
                SWING,
                Action::Sell,
                self.confidence_score(series)?,
                self.risk_level(series)?,
                -self.expected_return(series)?,
            )
            .with_reasoning(format!(
                "close {:.2} broke above {}-bar resistance {:.2}",
                price, window, resistance
            ))
        } else {
            Recommendation::new(SWING, Action::Hold, 0.5, 0.5, 0.0).with_reasoning(format!(
                "close {:.2} inside range {:.2}..{:.2}",
                price, support, resistance
            ))
        };

        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    /// Bars with a fixed +/- 1.0 band around each close; the last bar's
    /// close can be pushed outside the band.
    fn banded_series(closes: &[f64], last_close: f64) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut bars: Vec<OhlcvBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000 + (i as i64) * 10,
            })
            .collect();
        let last = bars.len() - 1;
        bars[last].close = last_close;
        Series::new("SWING", bars).unwrap()
    }

    #[test]
    fn hold_inside_range() {
        let series = banded_series(&[100.0, 101.0, 100.5, 100.0, 100.2, 100.4], 100.4);
        let rec = SwingAgent::default().generate_recommendation(&series).unwrap();

        assert_eq!(rec.action, Action::Hold);
        assert_eq!(rec.agent_name, SWING);
        assert_eq!(rec.confidence, 0.5);
        assert_eq!(rec.risk_level, 0.5);
        assert_eq!(rec.expected_return, 0.0);
    }

    #[test]
    fn buy_below_support() {
        // Last bar: low = 99.4 (from its own 100.4 band) but close = 95.0.
        let series = banded_series(&[100.0, 101.0, 100.5, 100.0, 100.2, 100.4], 95.0);
        let agent = SwingAgent::default();
        let rec = agent.generate_recommendation(&series).unwrap();

        assert_eq!(rec.action, Action::Buy);
        assert_relative_eq!(
            rec.expected_return,
            agent.expected_return(&series).unwrap(),
            epsilon = 1e-12
        );
        // Expected return follows the recent drop.
        assert!(rec.expected_return < 0.0);
    }

    #[test]
    fn sell_above_resistance_negates_expected_return() {
        let series = banded_series(&[100.0, 101.0, 100.5, 100.0, 100.2, 100.4], 105.0);
        let agent = SwingAgent::default();
        let rec = agent.generate_recommendation(&series).unwrap();

        assert_eq!(rec.action, Action::Sell);
        assert_relative_eq!(
            rec.expected_return,
            -agent.expected_return(&series).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn confidence_uses_whole_series_scale() {
        // Volume stddev alone is far above 2, so confidence saturates.
        let series = banded_series(&[100.0, 101.0, 100.5, 100.0, 100.2, 100.4], 95.0);
        let agent = SwingAgent::default();
        assert_eq!(agent.confidence_score(&series).unwrap(), 1.0);
    }

    #[test]
    fn risk_from_return_volatility() {
        let series = banded_series(&[100.0, 101.0, 100.5, 100.0, 100.2, 100.4], 100.4);
        let agent = SwingAgent::default();

        let returns = series.daily_returns();
        let expected = (stats::sample_stddev(&returns).unwrap() * 10.0).min(1.0);
        assert_relative_eq!(agent.risk_level(&series).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn expected_return_uses_lookback_tail() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let series = banded_series(&closes, 119.0);
        let agent = SwingAgent::new(SwingParams {
            lookback_period: 3,
            support_resistance_window: 5,
        });

        let returns = series.daily_returns();
        let expected = stats::mean(&returns[returns.len() - 3..]) * 100.0;
        assert_relative_eq!(agent.expected_return(&series).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn insufficient_bars() {
        let series = banded_series(&[100.0, 101.0, 102.0, 103.0], 103.0);
        let err = SwingAgent::default()
            .generate_recommendation(&series)
            .unwrap_err();
        assert!(matches!(
            err,
            TradeBossError::InsufficientData {
                bars: 4,
                minimum: 5,
                ..
            }
        ));
    }

    #[test]
    fn tiny_window_still_needs_three_bars() {
        let agent = SwingAgent::new(SwingParams {
            lookback_period: 14,
            support_resistance_window: 1,
        });
        assert_eq!(agent.required_bars(), 3);
    }
}
