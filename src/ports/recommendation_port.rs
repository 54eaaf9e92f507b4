//! External recommendation source port.
//!
//! An out-of-process advisor (for example a language-model service) answers
//! with the JSON contract below. Implementations report every failure as
//! `ExternalAgentUnavailable`; the boss then drops that agent from the vote.

use crate::domain::error::TradeBossError;
use crate::domain::series::Series;
use serde::Deserialize;

/// `{"action": "BUY", "confidence": 0.7, "risk_level": 0.3,
///   "expected_return": 2.5, "reasoning": "..."}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommendationPayload {
    pub action: String,
    pub confidence: f64,
    pub risk_level: f64,
    pub expected_return: f64,
    #[serde(default)]
    pub reasoning: Option<String>,
}

pub trait RecommendationPort: Send + Sync {
    fn fetch_recommendation(
        &self,
        series: &Series,
    ) -> Result<RecommendationPayload, TradeBossError>;
}
