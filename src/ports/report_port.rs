//! Decision report port trait.

use crate::domain::decision::Decision;
use crate::domain::error::TradeBossError;

/// Renders a decision for display or downstream consumption.
pub trait ReportPort {
    fn render(&self, decision: &Decision) -> Result<String, TradeBossError>;
}
