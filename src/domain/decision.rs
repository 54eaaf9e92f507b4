//! Boss output: the winning recommendation plus everything that was weighed.

use crate::domain::error::TradeBossError;
use crate::domain::recommendation::{Action, Recommendation};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub instrument: String,
    /// Date of the last observation the decision was made on.
    pub as_of: NaiveDate,
    /// Close of that observation, the reference price for verification.
    pub reference_close: f64,
    pub final_action: Action,
    pub confidence: f64,
    pub risk_level: f64,
    pub expected_return: f64,
    pub chosen_agent: String,
    pub score: f64,
    pub weighted_score: f64,
    pub all_recommendations: BTreeMap<String, Recommendation>,
    pub excluded: Vec<ExcludedAgent>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedAgent {
    pub agent_name: String,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    InsufficientData { bars: usize, minimum: usize },
    Unavailable { reason: String },
}

impl ExclusionReason {
    /// Maps a recoverable agent error to its exclusion reason; `None` for
    /// errors that must propagate.
    pub fn from_error(err: &TradeBossError) -> Option<Self> {
        match err {
            TradeBossError::InsufficientData { bars, minimum, .. } => {
                Some(ExclusionReason::InsufficientData {
                    bars: *bars,
                    minimum: *minimum,
                })
            }
            TradeBossError::ExternalAgentUnavailable { reason, .. } => {
                Some(ExclusionReason::Unavailable {
                    reason: reason.clone(),
                })
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::InsufficientData { bars, minimum } => {
                write!(f, "insufficient data ({} of {} bars)", bars, minimum)
            }
            ExclusionReason::Unavailable { reason } => write!(f, "unavailable ({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_from_recoverable_errors() {
        let insufficient = TradeBossError::InsufficientData {
            series: "BHP".into(),
            agent: "value".into(),
            bars: 10,
            minimum: 90,
        };
        assert_eq!(
            ExclusionReason::from_error(&insufficient),
            Some(ExclusionReason::InsufficientData {
                bars: 10,
                minimum: 90
            })
        );

        let unavailable = TradeBossError::ExternalAgentUnavailable {
            agent: "llm".into(),
            reason: "timeout".into(),
        };
        assert_eq!(
            ExclusionReason::from_error(&unavailable),
            Some(ExclusionReason::Unavailable {
                reason: "timeout".into()
            })
        );
    }

    #[test]
    fn fatal_errors_are_not_exclusions() {
        let invalid = TradeBossError::InvalidSeries {
            series: "BHP".into(),
            reason: "duplicate date".into(),
        };
        assert_eq!(ExclusionReason::from_error(&invalid), None);
    }

    #[test]
    fn exclusion_display() {
        let reason = ExclusionReason::InsufficientData {
            bars: 1,
            minimum: 5,
        };
        assert_eq!(reason.to_string(), "insufficient data (1 of 5 bars)");
    }

    #[test]
    fn exclusion_serializes_with_kind_tag() {
        let reason = ExclusionReason::Unavailable {
            reason: "offline".into(),
        };
        let json = serde_json::to_string(&reason).unwrap();
        assert_eq!(json, r#"{"kind":"unavailable","reason":"offline"}"#);
    }
}
