//! Plain-text decision report.

use crate::domain::decision::Decision;
use crate::domain::error::TradeBossError;
use crate::ports::report_port::ReportPort;
use std::fmt::Write;

pub struct TextReportAdapter;

fn format_signed_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}

fn render_decision(decision: &Decision) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "Trading decision for {}", decision.instrument)?;
    writeln!(
        out,
        "As of {} (close {:.2})",
        decision.as_of, decision.reference_close
    )?;
    writeln!(out)?;
    writeln!(out, "Final action:     {}", decision.final_action)?;
    writeln!(out, "Chosen agent:     {}", decision.chosen_agent)?;
    writeln!(out, "Confidence:       {:.2}", decision.confidence)?;
    writeln!(out, "Risk level:       {:.2}", decision.risk_level)?;
    writeln!(
        out,
        "Expected return:  {}",
        format_signed_pct(decision.expected_return)
    )?;
    writeln!(
        out,
        "Score:            {:.4} (weighted {:.4})",
        decision.score, decision.weighted_score
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "{:<12} {:<6} {:>10} {:>6} {:>10}",
        "Agent", "Action", "Confidence", "Risk", "Return"
    )?;
    writeln!(out, "{}", "-".repeat(48))?;
    for rec in decision.all_recommendations.values() {
        writeln!(
            out,
            "{:<12} {:<6} {:>10.2} {:>6.2} {:>10}",
            rec.agent_name,
            rec.action.to_string(),
            rec.confidence,
            rec.risk_level,
            format_signed_pct(rec.expected_return)
        )?;
    }

    if !decision.excluded.is_empty() {
        writeln!(out)?;
        writeln!(out, "Excluded agents:")?;
        for ex in &decision.excluded {
            writeln!(out, "  {}: {}", ex.agent_name, ex.reason)?;
        }
    }

    let reasons: Vec<_> = decision
        .all_recommendations
        .values()
        .filter_map(|r| r.reasoning.as_ref().map(|text| (&r.agent_name, text)))
        .collect();
    if !reasons.is_empty() {
        writeln!(out)?;
        writeln!(out, "Reasoning:")?;
        for (name, text) in reasons {
            writeln!(out, "  {}: {}", name, text)?;
        }
    }

    Ok(out)
}

impl ReportPort for TextReportAdapter {
    fn render(&self, decision: &Decision) -> Result<String, TradeBossError> {
        render_decision(decision).map_err(|e| TradeBossError::Data {
            reason: format!("failed to format report: {}", e),
        })
    }
}
