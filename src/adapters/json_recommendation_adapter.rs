//! File-backed external recommendation source.
//!
//! Reads a `RecommendationPayload` JSON document written by an out-of-process
//! advisor. The file is read on every fetch so a long-running caller sees
//! fresh advice.

use crate::domain::error::TradeBossError;
use crate::domain::series::Series;
use crate::ports::recommendation_port::{RecommendationPayload, RecommendationPort};
use std::fs;
use std::path::PathBuf;

pub struct JsonRecommendationAdapter {
    name: String,
    path: PathBuf,
}

impl JsonRecommendationAdapter {
    pub fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
        }
    }

    fn unavailable(&self, reason: String) -> TradeBossError {
        TradeBossError::ExternalAgentUnavailable {
            agent: self.name.clone(),
            reason,
        }
    }
}

impl RecommendationPort for JsonRecommendationAdapter {
    fn fetch_recommendation(
        &self,
        series: &Series,
    ) -> Result<RecommendationPayload, TradeBossError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            self.unavailable(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        let payload: RecommendationPayload = serde_json::from_str(&content)
            .map_err(|e| self.unavailable(format!("malformed recommendation: {}", e)))?;
        tracing::debug!(
            agent = %self.name,
            instrument = series.instrument(),
            action = %payload.action,
            "external recommendation loaded"
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::test_support::series_from_closes;
    use tempfile::TempDir;

    #[test]
    fn reads_payload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("advice.json");
        fs::write(
            &path,
            r#"{"action":"SELL","confidence":0.8,"risk_level":0.4,"expected_return":-3.5,"reasoning":"earnings miss"}"#,
        )
        .unwrap();

        let adapter = JsonRecommendationAdapter::new("llm", path);
        let payload = adapter
            .fetch_recommendation(&series_from_closes(&[10.0, 11.0]))
            .unwrap();

        assert_eq!(payload.action, "SELL");
        assert_eq!(payload.confidence, 0.8);
        assert_eq!(payload.expected_return, -3.5);
        assert_eq!(payload.reasoning.as_deref(), Some("earnings miss"));
    }

    #[test]
    fn reasoning_is_optional() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("advice.json");
        fs::write(
            &path,
            r#"{"action":"BUY","confidence":0.6,"risk_level":0.2,"expected_return":1.0}"#,
        )
        .unwrap();

        let payload = JsonRecommendationAdapter::new("llm", path)
            .fetch_recommendation(&series_from_closes(&[10.0]))
            .unwrap();
        assert_eq!(payload.reasoning, None);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let adapter = JsonRecommendationAdapter::new("llm", PathBuf::from("/nonexistent/advice.json"));
        let err = adapter
            .fetch_recommendation(&series_from_closes(&[10.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            TradeBossError::ExternalAgentUnavailable { ref agent, .. } if agent == "llm"
        ));
    }

    #[test]
    fn malformed_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("advice.json");
        fs::write(&path, "{\"action\": \"BUY\"").unwrap();

        let err = JsonRecommendationAdapter::new("llm", path)
            .fetch_recommendation(&series_from_closes(&[10.0]))
            .unwrap_err();
        assert!(matches!(err, TradeBossError::ExternalAgentUnavailable { .. }));
    }
}
