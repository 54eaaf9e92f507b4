//! Recommendation desirability score.
//!
//! score = 0.4 * confidence + 0.4 * (expected_return / 100) + 0.2 * (1 - risk_level)
//!
//! Unclamped: a large expected return dominates the ranking.

use crate::domain::recommendation::Recommendation;

pub const CONFIDENCE_WEIGHT: f64 = 0.4;
pub const RETURN_WEIGHT: f64 = 0.4;
pub const SAFETY_WEIGHT: f64 = 0.2;

pub fn score(recommendation: &Recommendation) -> f64 {
    CONFIDENCE_WEIGHT * recommendation.confidence
        + RETURN_WEIGHT * (recommendation.expected_return / 100.0)
        + SAFETY_WEIGHT * (1.0 - recommendation.risk_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recommendation::Action;
    use approx::assert_relative_eq;

    #[test]
    fn score_hold_defaults() {
        let rec = Recommendation::new("swing", Action::Hold, 0.5, 0.5, 0.0);
        // 0.2 + 0 + 0.1
        assert_relative_eq!(score(&rec), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn score_combines_all_terms() {
        let rec = Recommendation::new("quant", Action::Buy, 0.9, 0.1, 5.0);
        // 0.36 + 0.02 + 0.18
        assert_relative_eq!(score(&rec), 0.56, epsilon = 1e-12);
    }

    #[test]
    fn score_is_unbounded_by_expected_return() {
        let big = Recommendation::new("value", Action::Buy, 0.0, 1.0, 500.0);
        assert_relative_eq!(score(&big), 2.0, epsilon = 1e-12);

        let loss = Recommendation::new("value", Action::Sell, 0.0, 1.0, -500.0);
        assert_relative_eq!(score(&loss), -2.0, epsilon = 1e-12);
    }
}
