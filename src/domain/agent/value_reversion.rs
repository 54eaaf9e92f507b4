//! Value-reversion agent: fades large departures from the long-run mean.
//!
//! ma = MEAN(close, valuation_window), ratio = close / ma
//! close < ma * buy_discount -> BUY, close > ma * sell_premium -> SELL, else HOLD.
//! confidence = min(1, |1 - ratio|)
//! risk       = min(1, (STDDEV(daily return) + |1 - ratio|) / 2)
//! expected   = (ma - close) / close * 100, the same on every branch.

use crate::domain::agent::{defined, ensure_bars, TradingAgent, VALUE};
use crate::domain::error::TradeBossError;
use crate::domain::indicator::sma::rolling_mean;
use crate::domain::recommendation::{Action, Recommendation};
use crate::domain::series::Series;
use crate::domain::stats;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueReversionParams {
    pub valuation_window: usize,
    pub buy_discount: f64,
    pub sell_premium: f64,
}

impl Default for ValueReversionParams {
    fn default() -> Self {
        Self {
            valuation_window: 90,
            buy_discount: 0.95,
            sell_premium: 1.05,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValueReversionAgent {
    params: ValueReversionParams,
}

impl ValueReversionAgent {
    pub fn new(params: ValueReversionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ValueReversionParams {
        &self.params
    }

    fn valuation_mean(&self, series: &Series) -> Result<f64, TradeBossError> {
        ensure_bars(self, series)?;
        defined(
            rolling_mean(&series.closes(), self.params.valuation_window).last_valid(),
            self,
            series,
        )
    }

    /// |1 - close / ma|
    fn deviation(&self, series: &Series) -> Result<f64, TradeBossError> {
        let ma = self.valuation_mean(series)?;
        Ok((1.0 - series.last().close / ma).abs())
    }
}

impl TradingAgent for ValueReversionAgent {
    fn name(&self) -> &str {
        VALUE
    }

    fn required_bars(&self) -> usize {
        self.params.valuation_window.max(3)
    }

    fn confidence_score(&self, series: &Series) -> Result<f64, TradeBossError> {
        Ok(self.deviation(series)?.min(1.0))
    }

    fn risk_level(&self, series: &Series) -> Result<f64, TradeBossError> {
        let deviation = self.deviation(series)?;
        let volatility = defined(stats::sample_stddev(&series.daily_returns()), self, series)?;
        Ok(((volatility + deviation) / 2.0).min(1.0))
    }

    fn expected_return(&self, series: &Series) -> Result<f64, TradeBossError> {
        let ma = self.valuation_mean(series)?;
        let price = series.last().close;
        Ok((ma - price) / price * 100.0)
    }

    fn generate_recommendation(&self, series: &Series) -> Result<Recommendation, TradeBossError> {
        let ma = self.valuation_mean(series)?;
        let price = series.last().close;

        let action = if price < ma * self.params.buy_discount {
            Action::Buy
        } else if price > ma * self.params.sell_premium {
            Action::Sell
        } else {
            Action::Hold
        };

        Ok(Recommendation::new(
            VALUE,
            action,
            self.confidence_score(series)?,
            self.risk_level(series)?,
            self.expected_return(series)?,
        )
        .with_reasoning(format!(
            "close {:.2} is {:.1}% of its {}-bar mean {:.2}",
            price,
            price / ma * 100.0,
            self.params.valuation_window,
            ma
        )))
    }
}
