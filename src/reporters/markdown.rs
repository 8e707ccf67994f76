//! Markdown reporter
//!
//! GitHub-flavored Markdown, for pasting into tickets or committing next to
//! the scored data.

use super::{display_id, format_optional_percent, format_percent, DashboardReport};
use crate::pipeline::SweepPoint;
use anyhow::Result;

/// Render report as Markdown
pub fn render(report: &DashboardReport) -> Result<String> {
    let mut md = String::new();

    md.push_str("# Early Warning System - Credit Risk\n\n");
    if let Some(source) = &report.source {
        md.push_str(&format!("Source: `{}`  \n", source));
    }
    md.push_str(&format!("Records: {}  \n", report.records));
    md.push_str(&format!(
        "Alert rate target: {}  \nAlert threshold (EWS score): `{:.3}`\n\n",
        format_percent(report.target_rate),
        report.threshold
    ));

    let k = &report.kpis;
    md.push_str("## KPIs\n\n");
    md.push_str("| Metric | Value |\n|---|---|\n");
    md.push_str(&format!("| Alert Rate | {} |\n", k.alert_rate.percent()));
    md.push_str(&format!(
        "| Default Rate (Alerted) | {} |\n",
        k.alerted_outcome_rate.percent()
    ));
    md.push_str(&format!(
        "| Default Rate (Non-Alerted) | {} |\n",
        k.non_alerted_outcome_rate.percent()
    ));
    md.push_str(&format!(
        "| Portfolio Default Rate | {} |\n\n",
        k.portfolio_outcome_rate.percent()
    ));

    md.push_str("## Risk Bucket Performance\n\n");
    md.push_str("| Bucket | Loans | Default Rate |\n|---|---:|---:|\n");
    for s in &report.segments {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            s.label,
            s.members,
            s.outcome_rate.percent()
        ));
    }
    md.push_str(&format!(
        "\nBoundaries: Low ≤ `{:.3}` < Medium ≤ `{:.3}` < High\n\n",
        report.boundaries.low_upper, report.boundaries.medium_upper
    ));

    md.push_str(&format!(
        "## Flagged Accounts (Top Risk)\n\nShowing {} of {} flagged.\n\n",
        report.flagged.len(),
        report.flagged_total
    ));
    if !report.flagged.is_empty() {
        md.push_str("| # | ID | Score | Defaulted | Bucket |\n|---:|---|---:|---|---|\n");
        for (i, f) in report.flagged.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {:.3} | {} | {} |\n",
                i + 1,
                display_id(f),
                f.record.score,
                if f.record.outcome { "yes" } else { "no" },
                f.segment.label()
            ));
        }
    }

    Ok(md)
}

/// Render sweep points as a Markdown table
pub fn render_sweep(points: &[SweepPoint]) -> Result<String> {
    let mut md = String::from("# Alert Rate Sweep\n\n");
    md.push_str(
        "| Target | Threshold | Realized | Alerted | Default (Alerted) | Default (Non-Alerted) |\n\
         |---:|---:|---:|---:|---:|---:|\n",
    );
    for p in points {
        md.push_str(&format!(
            "| {} | {:.3} | {} | {} | {} | {} |\n",
            format_percent(p.target_rate),
            p.threshold,
            format_percent(p.realized_alert_rate),
            p.alerted,
            format_optional_percent(p.alerted_outcome_rate),
            format_optional_percent(p.non_alerted_outcome_rate)
        ));
    }
    Ok(md)
}
