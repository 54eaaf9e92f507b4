//! Core domain types and logic.

pub mod ohlcv;
pub mod series;
pub mod stats;
pub mod indicator;
pub mod recommendation;
pub mod scorer;
pub mod agent;
pub mod decision;
pub mod boss;
pub mod verification;
pub mod config_validation;
pub mod error;
