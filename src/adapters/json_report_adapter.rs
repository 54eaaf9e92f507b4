//! JSON decision report.

use crate::domain::decision::Decision;
use crate::domain::error::TradeBossError;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn render(&self, decision: &Decision) -> Result<String, TradeBossError> {
        serde_json::to_string_pretty(decision).map_err(|e| TradeBossError::Data {
            reason: format!("failed to serialize decision: {}", e),
        })
    }
}
