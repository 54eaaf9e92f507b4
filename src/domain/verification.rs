//! Verification of past decisions against realized prices.
//!
//! This is the feedback collaborator of the boss, not part of it: the boss
//! never calls into this module. A caller holding a `Decision` and the bars
//! that followed it uses [`evaluate`] to mark each agent right or wrong, then
//! feeds [`Verification::performance`] to `TradingBoss::update_weights`.
//!
//! Movement over the horizon is classified as Up, Down or Neutral (inside
//! the neutral band). BUY is correct on Up, SELL on Down, HOLD on Neutral.

use crate::domain::decision::Decision;
use crate::domain::error::TradeBossError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::recommendation::Action;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerificationSettings {
    /// Observations after the decision date to look ahead.
    pub horizon_days: usize,
    /// Absolute percentage change treated as no significant move.
    pub neutral_band_pct: f64,
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            horizon_days: 3,
            neutral_band_pct: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Movement {
    Up,
    Down,
    Neutral,
}

impl Movement {
    pub fn classify(change_pct: f64, neutral_band_pct: f64) -> Self {
        if change_pct.abs() < neutral_band_pct {
            Movement::Neutral
        } else if change_pct > 0.0 {
            Movement::Up
        } else {
            Movement::Down
        }
    }

    pub fn confirms(&self, action: Action) -> bool {
        matches!(
            (self, action),
            (Movement::Up, Action::Buy) | (Movement::Down, Action::Sell) | (Movement::Neutral, Action::Hold)
        )
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Movement::Up => write!(f, "UP"),
            Movement::Down => write!(f, "DOWN"),
            Movement::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentOutcome {
    pub agent_name: String,
    pub action: Action,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    pub instrument: String,
    pub as_of: NaiveDate,
    pub verified_on: NaiveDate,
    pub actual_change_pct: f64,
    pub movement: Movement,
    pub decision_correct: bool,
    pub outcomes: Vec<AgentOutcome>,
}

impl Verification {
    /// 1.0 for every agent whose recommendation was confirmed, 0.0 otherwise.
    pub fn performance(&self) -> HashMap<String, f64> {
        self.outcomes
            .iter()
            .map(|o| (o.agent_name.clone(), if o.correct { 1.0 } else { 0.0 }))
            .collect()
    }
}

/// Compares `decision` with the close `horizon_days` observations after its
/// `as_of` date. Bars on or before `as_of` in `subsequent` are ignored.
pub fn evaluate(
    decision: &Decision,
    subsequent: &[OhlcvBar],
    settings: &VerificationSettings,
) -> Result<Verification, TradeBossError> {
    let later: Vec<&OhlcvBar> = subsequent
        .iter()
        .filter(|b| b.date > decision.as_of)
        .collect();

    let horizon = settings.horizon_days.max(1);
    let target = later
        .get(horizon - 1)
        .ok_or_else(|| TradeBossError::InsufficientData {
            series: decision.instrument.clone(),
            agent: "verification".to_string(),
            bars: later.len(),
            minimum: horizon,
        })?;

    let actual_change_pct = (target.close - decision.reference_close) / decision.reference_close * 100.0;
    let movement = Movement::classify(actual_change_pct, settings.neutral_band_pct);

    let outcomes = decision
        .all_recommendations
        .values()
        .map(|rec| AgentOutcome {
            agent_name: rec.agent_name.clone(),
            action: rec.action,
            correct: movement.confirms(rec.action),
        })
        .collect();

    Ok(Verification {
        instrument: decision.instrument.clone(),
        as_of: decision.as_of,
        verified_on: target.date,
        actual_change_pct,
        movement,
        decision_correct: movement.confirms(decision.final_action),
        outcomes,
    })
}
