//! Strategy agents.
//!
//! Every agent reads the same validated [`Series`] and returns one
//! [`Recommendation`]. Agents hold only their window parameters, so a call is
//! a pure function of the input and safe to run on any thread.
//!
//! The four deterministic variants live in their own modules; [`external`]
//! adapts an out-of-process recommendation source to the same trait.

pub mod external;
pub mod momentum;
pub mod quantitative;
pub mod swing;
pub mod value_reversion;

use crate::domain::error::TradeBossError;
use crate::domain::recommendation::Recommendation;
use crate::domain::series::Series;

pub use momentum::{MomentumAgent, MomentumParams};
pub use quantitative::{QuantitativeAgent, QuantitativeParams};
pub use swing::{SwingAgent, SwingParams};
pub use value_reversion::{ValueReversionAgent, ValueReversionParams};

pub const SWING: &str = "swing";
pub const MOMENTUM: &str = "momentum";
pub const VALUE: &str = "value";
pub const QUANT: &str = "quant";

/// Names of the deterministic agents in registration order.
pub const DETERMINISTIC_AGENTS: [&str; 4] = [SWING, MOMENTUM, VALUE, QUANT];

pub trait TradingAgent: Send + Sync {
    fn name(&self) -> &str;

    /// Shortest series for which every statistic the agent reads is defined.
    fn required_bars(&self) -> usize;

    fn confidence_score(&self, series: &Series) -> Result<f64, TradeBossError> {
        Ok(self.generate_recommendation(series)?.confidence)
    }

    fn risk_level(&self, series: &Series) -> Result<f64, TradeBossError> {
        Ok(self.generate_recommendation(series)?.risk_level)
    }

    fn expected_return(&self, series: &Series) -> Result<f64, TradeBossError> {
        Ok(self.generate_recommendation(series)?.expected_return)
    }

    fn generate_recommendation(&self, series: &Series) -> Result<Recommendation, TradeBossError>;
}

/// Fails with `InsufficientData` unless the series covers `agent`'s windows.
pub fn ensure_bars(agent: &dyn TradingAgent, series: &Series) -> Result<(), TradeBossError> {
    let minimum = agent.required_bars();
    if series.len() < minimum {
        return Err(TradeBossError::InsufficientData {
            series: series.instrument().to_string(),
            agent: agent.name().to_string(),
            bars: series.len(),
            minimum,
        });
    }
    Ok(())
}

/// Converts an undefined rolling value into `InsufficientData`. Only reachable
/// if `required_bars` under-reports the windows an agent reads.
pub(crate) fn defined(
    value: Option<f64>,
    agent: &dyn TradingAgent,
    series: &Series,
) -> Result<f64, TradeBossError> {
    value.ok_or_else(|| TradeBossError::InsufficientData {
        series: series.instrument().to_string(),
        agent: agent.name().to_string(),
        bars: series.len(),
        minimum: agent.required_bars(),
    })
}

/// The four deterministic agents with default parameters, in registration
/// order.
pub fn default_agents() -> Vec<Box<dyn TradingAgent>> {
    vec![
        Box::new(SwingAgent::default()),
        Box::new(MomentumAgent::default()),
        Box::new(ValueReversionAgent::default()),
        Box::new(QuantitativeAgent::default()),
    ]
}
