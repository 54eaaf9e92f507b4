//! Trading boss: runs every agent, scores and weights their recommendations,
//! and picks the winner.
//!
//! The boss owns the only mutable state in the engine: the weight table
//! (behind an `RwLock`, read once per decision and written by
//! `update_weights`) and the decision history (behind a `Mutex`). Agents are
//! evaluated concurrently with rayon, borrowing the caller's series.

use crate::domain::agent::{
    MomentumAgent, MomentumParams, QuantitativeAgent, QuantitativeParams, SwingAgent, SwingParams,
    TradingAgent, ValueReversionAgent, ValueReversionParams, DETERMINISTIC_AGENTS,
};
use crate::domain::decision::{Decision, ExcludedAgent, ExclusionReason};
use crate::domain::error::TradeBossError;
use crate::domain::recommendation::Recommendation;
use crate::domain::scorer;
use crate::domain::series::Series;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError, RwLock};
use tracing::{debug, error, info, warn};

pub const DEFAULT_WEIGHT: f64 = 0.25;

/// Parameters for the four deterministic agents and their starting weights.
#[derive(Debug, Clone, PartialEq)]
pub struct BossConfig {
    pub swing: SwingParams,
    pub momentum: MomentumParams,
    pub value: ValueReversionParams,
    pub quant: QuantitativeParams,
    pub weights: HashMap<String, f64>,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            swing: SwingParams::default(),
            momentum: MomentumParams::default(),
            value: ValueReversionParams::default(),
            quant: QuantitativeParams::default(),
            weights: DETERMINISTIC_AGENTS
                .iter()
                .map(|name| (name.to_string(), DEFAULT_WEIGHT))
                .collect(),
        }
    }
}

pub struct TradingBoss {
    agents: Vec<Box<dyn TradingAgent>>,
    weights: RwLock<HashMap<String, f64>>,
    history: Mutex<Vec<Decision>>,
}

impl std::fmt::Debug for TradingBoss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingBoss")
            .field("agents", &self.agents.len())
            .field("weights", &self.weights)
            .field("history", &self.history)
            .finish()
    }
}

impl Default for TradingBoss {
    fn default() -> Self {
        Self::new()
    }
}

impl TradingBoss {
    /// Swing, momentum, value and quant with default parameters, each
    /// weighted 0.25.
    pub fn new() -> Self {
        Self::from_config(&BossConfig::default())
    }

    /// A boss with no agents; populate it with `register_agent`.
    pub fn empty() -> Self {
        Self {
            agents: Vec::new(),
            weights: RwLock::new(HashMap::new()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &BossConfig) -> Self {
        let agents: Vec<Box<dyn TradingAgent>> = vec![
            Box::new(SwingAgent::new(config.swing)),
            Box::new(MomentumAgent::new(config.momentum)),
            Box::new(ValueReversionAgent::new(config.value)),
            Box::new(QuantitativeAgent::new(config.quant)),
        ];
        let weights = agents
            .iter()
            .map(|agent| {
                let weight = config
                    .weights
                    .get(agent.name())
                    .copied()
                    .unwrap_or(DEFAULT_WEIGHT);
                (agent.name().to_string(), weight)
            })
            .collect();

        Self {
            agents,
            weights: RwLock::new(weights),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Appends an agent after those already registered. A weight already in
    /// the table for this name (from an earlier `update_weights`) is kept.
    pub fn register_agent(
        &mut self,
        agent: Box<dyn TradingAgent>,
        weight: f64,
    ) -> Result<(), TradeBossError> {
        let name = agent.name().to_string();
        if self.agents.iter().any(|a| a.name() == name) {
            return Err(TradeBossError::DuplicateAgent(name));
        }
        self.weights
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_insert(weight);
        self.agents.push(agent);
        Ok(())
    }

    pub fn agents(&self) -> &[Box<dyn TradingAgent>] {
        &self.agents
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    pub fn weight(&self, agent_name: &str) -> Option<f64> {
        self.read_weights().get(agent_name).copied()
    }

    /// Snapshot of the weight table.
    pub fn weights(&self) -> HashMap<String, f64> {
        self.read_weights().clone()
    }

    /// Snapshot of every decision made by this boss, oldest first.
    pub fn history(&self) -> Vec<Decision> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_history(&self) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn read_weights(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, f64>> {
        self.weights.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs every agent on the rayon pool. Results come back in registration
    /// order; a panicking agent is reported as unavailable.
    fn evaluate_agents(&self, series: &Series) -> Vec<Result<Recommendation, TradeBossError>> {
        self.agents
            .par_iter()
            .map(|agent| {
                panic::catch_unwind(AssertUnwindSafe(|| agent.generate_recommendation(series)))
                    .unwrap_or_else(|_| {
                        error!(agent = agent.name(), "agent panicked during evaluation");
                        Err(TradeBossError::ExternalAgentUnavailable {
                            agent: agent.name().to_string(),
                            reason: "agent panicked".to_string(),
                        })
                    })
            })
            .collect()
    }

    /// Produces a decision for `series` and appends it to the history.
    ///
    /// Agents that lack data or are unavailable are excluded from the vote.
    /// If every agent is excluded the call fails with `InsufficientData`
    /// naming agent `all` and the smallest series length any agent accepts.
    /// Ties in weighted score go to the agent registered first.
    pub fn decide(&self, series: &Series) -> Result<Decision, TradeBossError> {
        if self.agents.is_empty() {
            return Err(TradeBossError::NoAgents);
        }

        let mut recommendations: Vec<Recommendation> = Vec::with_capacity(self.agents.len());
        let mut excluded: Vec<ExcludedAgent> = Vec::new();

        for (agent, result) in self.agents.iter().zip(self.evaluate_agents(series)) {
            match result {
                Ok(rec) => {
                    debug!(
                        agent = agent.name(),
                        action = %rec.action,
                        confidence = rec.confidence,
                        risk_level = rec.risk_level,
                        expected_return = rec.expected_return,
                        "agent recommendation"
                    );
                    recommendations.push(rec);
                }
                Err(err) => match ExclusionReason::from_error(&err) {
                    Some(reason) => {
                        warn!(agent = agent.name(), series = series.instrument(), %reason, "agent excluded");
                        excluded.push(ExcludedAgent {
                            agent_name: agent.name().to_string(),
                            reason,
                        });
                    }
                    None => return Err(err),
                },
            }
        }

        if recommendations.is_empty() {
            let minimum = self
                .agents
                .iter()
                .map(|a| a.required_bars())
                .min()
                .unwrap_or(0);
            return Err(TradeBossError::InsufficientData {
                series: series.instrument().to_string(),
                agent: "all".to_string(),
                bars: series.len(),
                minimum,
            });
        }

        // (index, score, weighted score) of the current leader.
        let mut best: Option<(usize, f64, f64)> = None;
        {
            let weights = self.read_weights();
            for (i, rec) in recommendations.iter().enumerate() {
                let score = scorer::score(rec);
                let weight = weights.get(&rec.agent_name).copied().unwrap_or(0.0);
                let weighted = score * weight;
                debug!(agent = %rec.agent_name, score, weight, weighted, "scored");
                if !weighted.is_finite() {
                    warn!(agent = %rec.agent_name, weighted, "skipping non-finite weighted score");
                    continue;
                }
                if best.is_none_or(|(_, _, leader)| weighted > leader) {
                    best = Some((i, score, weighted));
                }
            }
        }

        let (winner, score, weighted_score) = best.ok_or(TradeBossError::NoAgents)?;
        let chosen = recommendations[winner].clone();
        let last = series.last();

        let decision = Decision {
            instrument: series.instrument().to_string(),
            as_of: last.date,
            reference_close: last.close,
            final_action: chosen.action,
            confidence: chosen.confidence,
            risk_level: chosen.risk_level,
            expected_return: chosen.expected_return,
            chosen_agent: chosen.agent_name.clone(),
            score,
            weighted_score,
            all_recommendations: recommendations
                .into_iter()
                .map(|rec| (rec.agent_name.clone(), rec))
                .collect::<BTreeMap<_, _>>(),
            excluded,
            timestamp: Utc::now(),
        };

        info!(
            series = %decision.instrument,
            action = %decision.final_action,
            agent = %decision.chosen_agent,
            weighted_score,
            "decision"
        );

        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(decision.clone());

        Ok(decision)
    }

    /// Reweights agents from externally measured performance.
    ///
    /// When the figures sum to more than zero, every named agent gets
    /// `max(perf, 0) / sum(max(perf, 0))`; agents not named keep their weight.
    /// Otherwise the table is left alone. Non-finite figures are ignored.
    /// Returns whether the table changed.
    pub fn update_weights(&self, performance: &HashMap<String, f64>) -> bool {
        let usable: Vec<(&String, f64)> = performance
            .iter()
            .filter(|(name, value)| {
                if value.is_finite() {
                    true
                } else {
                    warn!(agent = %name, value = **value, "ignoring non-finite performance figure");
                    false
                }
            })
            .map(|(name, value)| (name, *value))
            .collect();

        let total: f64 = usable.iter().map(|(_, v)| v).sum();
        if total <= 0.0 {
            info!(total, "performance total not positive, weights unchanged");
            return false;
        }

        let floored_total: f64 = usable.iter().map(|(_, v)| v.max(0.0)).sum();
        let mut weights = self.weights.write().unwrap_or_else(PoisonError::into_inner);
        for (name, value) in usable {
            weights.insert(name.clone(), value.max(0.0) / floored_total);
        }
        info!(agents = performance.len(), "weights updated");
        true
    }
}
