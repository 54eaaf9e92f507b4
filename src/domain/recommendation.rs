//! Agent output: an action with confidence, risk and expected return.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Action::Buy),
            "SELL" => Ok(Action::Sell),
            "HOLD" => Ok(Action::Hold),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub agent_name: String,
    pub action: Action,
    /// In [0, 1].
    pub confidence: f64,
    /// In [0, 1].
    pub risk_level: f64,
    /// Signed percentage.
    pub expected_return: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Recommendation {
    /// Stamps the recommendation with the current time and clamps confidence
    /// and risk into [0, 1]. Non-finite inputs clamp to 0.
    pub fn new(
        agent_name: impl Into<String>,
        action: Action,
        confidence: f64,
        risk_level: f64,
        expected_return: f64,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            action,
            confidence: clamp_unit(confidence),
            risk_level: clamp_unit(risk_level),
            expected_return,
            reasoning: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_display_and_parse() {
        assert_eq!(Action::Buy.to_string(), "BUY");
        assert_eq!(Action::Sell.to_string(), "SELL");
        assert_eq!(Action::Hold.to_string(), "HOLD");
        assert_eq!("buy".parse::<Action>().unwrap(), Action::Buy);
        assert_eq!(" Sell ".parse::<Action>().unwrap(), Action::Sell);
        assert!("STRONG_BUY".parse::<Action>().is_err());
    }

    #[test]
    fn action_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Action::Hold).unwrap(), "\"HOLD\"");
        let parsed: Action = serde_json::from_str("\"SELL\"").unwrap();
        assert_eq!(parsed, Action::Sell);
    }

    #[test]
    fn new_clamps_confidence_and_risk() {
        let rec = Recommendation::new("quant", Action::Buy, 1.7, -0.2, 3.5);
        assert_eq!(rec.confidence, 1.0);
        assert_eq!(rec.risk_level, 0.0);
        assert_eq!(rec.expected_return, 3.5);
        assert!(rec.reasoning.is_none());
    }

    #[test]
    fn nan_clamps_to_zero() {
        let rec = Recommendation::new("quant", Action::Hold, f64::NAN, f64::NAN, 0.0);
        assert_eq!(rec.confidence, 0.0);
        assert_eq!(rec.risk_level, 0.0);
    }

    #[test]
    fn with_reasoning_attaches_text() {
        let rec = Recommendation::new("swing", Action::Hold, 0.5, 0.5, 0.0)
            .with_reasoning("inside range");
        assert_eq!(rec.reasoning.as_deref(), Some("inside range"));
    }
}
