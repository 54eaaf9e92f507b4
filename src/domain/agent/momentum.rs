//! Momentum agent: moving-average crossover.
//!
//! spread = (MEAN(close, short) - MEAN(close, long)) / MEAN(close, long)
//! spread > 0 -> BUY, otherwise SELL. This agent never holds.
//! confidence = min(1, |spread|), risk = min(1, STDDEV(daily return, short) * 10),
//! expected return = spread * 100.

use crate::domain::agent::{defined, ensure_bars, TradingAgent, MOMENTUM};
use crate::domain::error::TradeBossError;
use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::stddev::rolling_stddev;
use crate::domain::recommendation::{Action, Recommendation};
use crate::domain::series::Series;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumParams {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            short_window: 10,
            long_window: 30,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MomentumAgent {
    params: MomentumParams,
}

impl MomentumAgent {
    pub fn new(params: MomentumParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MomentumParams {
        &self.params
    }

    /// Last short and long moving averages.
    fn moving_averages(&self, series: &Series) -> Result<(f64, f64), TradeBossError> {
        ensure_bars(self, series)?;
        let closes = series.closes();
        let short_ma = defined(
            rolling_mean(&closes, self.params.short_window).last_valid(),
            self,
            series,
        )?;
        let long_ma = defined(
            rolling_mean(&closes, self.params.long_window).last_valid(),
            self,
            series,
        )?;
        Ok((short_ma, long_ma))
    }

    fn spread(&self, series: &Series) -> Result<f64, TradeBossError> {
        let (short_ma, long_ma) = self.moving_averages(series)?;
        Ok((short_ma - long_ma) / long_ma)
    }
}

impl TradingAgent for MomentumAgent {
    fn name(&self) -> &str {
        MOMENTUM
    }

    fn required_bars(&self) -> usize {
        // The short-window return stddev needs short + 1 closes.
        self.params.long_window.max(self.params.short_window + 1)
    }

    fn confidence_score(&self, series: &Series) -> Result<f64, TradeBossError> {
        Ok(self.spread(series)?.abs().min(1.0))
    }

    fn risk_level(&self, series: &Series) -> Result<f64, TradeBossError> {
        ensure_bars(self, series)?;
        let volatility = defined(
            rolling_stddev(&series.daily_returns(), self.params.short_window).last_valid(),
            self,
            series,
        )?;
        Ok((volatility * 10.0).min(1.0))
    }

    fn expected_return(&self, series: &Series) -> Result<f64, TradeBossError> {
        Ok(self.spread(series)? * 100.0)
    }

    fn generate_recommendation(&self, series: &Series) -> Result<Recommendation, TradeBossError> {
        let (short_ma, long_ma) = self.moving_averages(series)?;
        let action = if short_ma > long_ma {
            Action::Buy
        } else {
            Action::Sell
        };

        Ok(Recommendation::new(
            MOMENTUM,
            action,
            self.confidence_score(series)?,
            self.risk_level(series)?,
            self.expected_return(series)?,
        )
        .with_reasoning(format!(
            "{}-bar mean {:.2} vs {}-bar mean {:.2}",
            self.params.short_window, short_ma, self.params.long_window, long_ma
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::test_support::{geometric, series_from_closes};
    use approx::assert_relative_eq;

    #[test]
    fn uptrend_buys() {
        let series = series_from_closes(&geometric(100.0, 0.01, 40));
        let rec = MomentumAgent::default()
            .generate_recommendation(&series)
            .unwrap();
        assert_eq!(rec.action, Action::Buy);
        assert!(rec.expected_return > 0.0);
    }

    #[test]
    fn downtrend_sells() {
        let series = series_from_closes(&geometric(100.0, -0.01, 40));
        let rec = MomentumAgent::default()
            .generate_recommendation(&series)
            .unwrap();
        assert_eq!(rec.action, Action::Sell);
        assert!(rec.expected_return < 0.0);
    }

    #[test]
    fn flat_series_sells_never_holds() {
        let series = series_from_closes(&[50.0; 30]);
        let rec = MomentumAgent::default()
            .generate_recommendation(&series)
            .unwrap();
        assert_eq!(rec.action, Action::Sell);
        assert_eq!(rec.confidence, 0.0);
        assert_eq!(rec.expected_return, 0.0);
        assert_eq!(rec.risk_level, 0.0);
    }

    #[test]
    fn spread_formula() {
        let closes: Vec<f64> = (1..=6).map(|i| i as f64 * 10.0).collect();
        let series = series_from_closes(&closes);
        let agent = MomentumAgent::new(MomentumParams {
            short_window: 2,
            long_window: 4,
        });

        // short = (50 + 60) / 2 = 55, long = (30 + 40 + 50 + 60) / 4 = 45
        let spread = (55.0 - 45.0) / 45.0;
        assert_relative_eq!(agent.expected_return(&series).unwrap(), spread * 100.0, epsilon = 1e-12);
        assert_relative_eq!(agent.confidence_score(&series).unwrap(), spread, epsilon = 1e-12);
    }

    #[test]
    fn risk_uses_short_window_of_returns() {
        let closes = [100.0, 102.0, 101.0, 104.0, 103.0, 106.0];
        let series = series_from_closes(&closes);
        let agent = MomentumAgent::new(MomentumParams {
            short_window: 3,
            long_window: 4,
        });

        let returns = series.daily_returns();
        let expected = crate::domain::stats::sample_stddev(&returns[returns.len() - 3..]).unwrap();
        assert_relative_eq!(
            agent.risk_level(&series).unwrap(),
            (expected * 10.0).min(1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn needs_long_window() {
        let series = series_from_closes(&geometric(100.0, 0.01, 29));
        let err = MomentumAgent::default()
            .generate_recommendation(&series)
            .unwrap_err();
        assert!(matches!(
            err,
            TradeBossError::InsufficientData {
                bars: 29,
                minimum: 30,
                ..
            }
        ));
    }

    #[test]
    fn required_bars_covers_return_window() {
        let agent = MomentumAgent::new(MomentumParams {
            short_window: 10,
            long_window: 10,
        });
        assert_eq!(agent.required_bars(), 11);
    }
}
