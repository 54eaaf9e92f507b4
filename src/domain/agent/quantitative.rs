//! Quantitative agent: trend in daily returns, gated on low volatility.
//!
//! momentum = MEAN(daily return, w), volatility = STDDEV(daily return, w)
//! momentum > 0 and volatility < ceiling -> BUY
//! momentum < 0 and volatility < ceiling -> SELL
//! otherwise HOLD.
//! confidence = 1 - volatility clamped to [0, 1], risk = min(1, volatility * 10),
//! expected return = momentum * 100.

use crate::domain::agent::{defined, ensure_bars, TradingAgent, QUANT};
use crate::domain::error::TradeBossError;
use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::stddev::rolling_stddev;
use crate::domain::recommendation::{clamp_unit, Action, Recommendation};
use crate::domain::series::Series;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantitativeParams {
    pub feature_window: usize,
    pub volatility_ceiling: f64,
}

impl Default for QuantitativeParams {
    fn default() -> Self {
        Self {
            feature_window: 20,
            volatility_ceiling: 0.02,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuantitativeAgent {
    params: QuantitativeParams,
}

impl QuantitativeAgent {
    pub fn new(params: QuantitativeParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &QuantitativeParams {
        &self.params
    }

    /// Last rolling (momentum, volatility) of daily returns.
    fn features(&self, series: &Series) -> Result<(f64, f64), TradeBossError> {
        ensure_bars(self, series)?;
        let returns = series.daily_returns();
        let window = self.params.feature_window;
        let momentum = defined(rolling_mean(&returns, window).last_valid(), self, series)?;
        let volatility = defined(rolling_stddev(&returns, window).last_valid(), self, series)?;
        Ok((momentum, volatility))
    }
}

impl TradingAgent for QuantitativeAgent {
    fn name(&self) -> &str {
        QUANT
    }

    fn required_bars(&self) -> usize {
        // w returns need w + 1 closes; a stddev needs at least two returns.
        self.params.feature_window.max(2) + 1
    }

    fn confidence_score(&self, series: &Series) -> Result<f64, TradeBossError> {
        let (_, volatility) = self.features(series)?;
        Ok(clamp_unit(1.0 - volatility))
    }

    fn risk_level(&self, series: &Series) -> Result<f64, TradeBossError> {
        let (_, volatility) = self.features(series)?;
        Ok((volatility * 10.0).min(1.0))
    }

    fn expected_return(&self, series: &Series) -> Result<f64, TradeBossError> {
        let (momentum, _) = self.features(series)?;
        Ok(momentum * 100.0)
    }

    fn generate_recommendation(&self, series: &Series) -> Result<Recommendation, TradeBossError> {
        let (momentum, volatility) = self.features(series)?;
        let calm = volatility < self.params.volatility_ceiling;

        let action = if momentum > 0.0 && calm {
            Action::Buy
        } else if momentum < 0.0 && calm {
            Action::Sell
        } else {
            Action::Hold
        };

        Ok(Recommendation::new(
            QUANT,
            action,
            clamp_unit(1.0 - volatility),
            (volatility * 10.0).min(1.0),
            momentum * 100.0,
        )
        .with_reasoning(format!(
            "{}-bar mean return {:.4}, volatility {:.4}",
            self.params.feature_window, momentum, volatility
        )))
    }
}
