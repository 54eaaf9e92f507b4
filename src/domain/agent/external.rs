//! Adapter from an external recommendation source to [`TradingAgent`].
//!
//! The source is non-deterministic and may be offline. Whatever goes wrong
//! (transport failure, malformed payload, unknown action) surfaces as
//! `ExternalAgentUnavailable`, which the boss always treats as an exclusion.

use crate::domain::agent::{ensure_bars, TradingAgent};
use crate::domain::error::TradeBossError;
use crate::domain::recommendation::{Action, Recommendation};
use crate::domain::series::Series;
use crate::ports::recommendation_port::{RecommendationPayload, RecommendationPort};

pub struct ExternalAgent {
    name: String,
    port: Box<dyn RecommendationPort>,
    required_bars: usize,
}

impl ExternalAgent {
    pub fn new(name: impl Into<String>, port: Box<dyn RecommendationPort>) -> Self {
        Self {
            name: name.into(),
            port,
            required_bars: 1,
        }
    }

    /// Refuse series shorter than `bars` before calling out.
    pub fn with_required_bars(mut self, bars: usize) -> Self {
        self.required_bars = bars.max(1);
        self
    }

    fn unavailable(&self, reason: impl Into<String>) -> TradeBossError {
        TradeBossError::ExternalAgentUnavailable {
            agent: self.name.clone(),
            reason: reason.into(),
        }
    }

    fn interpret(&self, payload: RecommendationPayload) -> Result<Recommendation, TradeBossError> {
        let action: Action = payload
            .action
            .parse()
            .map_err(|e: String| self.unavailable(e))?;

        let numbers = [
            ("confidence", payload.confidence),
            ("risk_level", payload.risk_level),
            ("expected_return", payload.expected_return),
        ];
        if let Some((field, value)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(self.unavailable(format!("{} is not a finite number ({})", field, value)));
        }

        let recommendation = Recommendation::new(
            self.name.clone(),
            action,
            payload.confidence,
            payload.risk_level,
            payload.expected_return,
        );
        Ok(match payload.reasoning {
            Some(reasoning) => recommendation.with_reasoning(reasoning),
            None => recommendation,
        })
    }
}

impl TradingAgent for ExternalAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_bars(&self) -> usize {
        self.required_bars
    }

    fn generate_recommendation(&self, series: &Series) -> Result<Recommendation, TradeBossError> {
        ensure_bars(self, series)?;
        let payload = self.port.fetch_recommendation(series).map_err(|e| match e {
            TradeBossError::ExternalAgentUnavailable { .. } => e,
            other => self.unavailable(other.to_string()),
        })?;
        self.interpret(payload)
    }
}
