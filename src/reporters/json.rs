//! JSON reporter
//!
//! Outputs the full DashboardReport as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or feeding a chart front end.

use super::DashboardReport;
use crate::pipeline::SweepPoint;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &DashboardReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render sweep points as a JSON array
pub fn render_sweep(points: &[SweepPoint]) -> Result<String> {
    Ok(serde_json::to_string_pretty(points)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["records"], 10);
        assert_eq!(parsed["source"], "scores.csv");
        assert_eq!(parsed["kpis"]["alert_rate"]["hits"], 3);
        assert_eq!(parsed["segments"][2]["segment"], "high");
        assert_eq!(parsed["flagged"].as_array().expect("flagged array").len(), 3);
        assert_eq!(parsed["flagged"][0]["id"], "L010");
    }

    #[test]
    fn test_json_unavailable_metric_is_null() {
        let mut report = test_report();
        report.kpis.non_alerted_outcome_rate.value = None;
        report.kpis.non_alerted_outcome_rate.unavailable = Some("empty".into());
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert!(parsed["kpis"]["non_alerted_outcome_rate"]["value"].is_null());
        assert_eq!(parsed["kpis"]["non_alerted_outcome_rate"]["unavailable"], "empty");
        assert!(parsed["kpis"]["alert_rate"].get("unavailable").is_none());
    }
}
