//! Text (terminal) reporter with colors and ASCII charts

use super::{display_id, format_optional_percent, format_percent, DashboardReport};
use crate::models::RiskSegment;
use crate::pipeline::SweepPoint;
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Width of the longest bar in a chart
const BAR_WIDTH: usize = 40;

/// Segment colors
fn segment_color(segment: &RiskSegment) -> &'static str {
    match segment {
        RiskSegment::Low => "\x1b[32m",    // Green
        RiskSegment::Medium => "\x1b[33m", // Yellow
        RiskSegment::High => "\x1b[31m",   // Red
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

/// Render report as formatted terminal output
pub fn render(report: &DashboardReport) -> Result<String> {
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "\n{BOLD}Early Warning System - Credit Risk{RESET}\n"
    ));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    if let Some(source) = &report.source {
        out.push_str(&format!("Source: {}  ", source));
    }
    out.push_str(&format!("Records: {}\n", report.records));
    out.push_str(&format!(
        "Alert rate target: {}  Threshold (EWS score): {BOLD}{:.3}{RESET}\n\n",
        format_percent(report.target_rate),
        report.threshold
    ));

    // KPIs
    let k = &report.kpis;
    out.push_str(&format!("{BOLD}KPIS{RESET}\n"));
    out.push_str(&format!(
        "  Alert Rate: {}  Default Rate (Alerted): {}  Default Rate (Non-Alerted): {}\n",
        k.alert_rate.percent(),
        k.alerted_outcome_rate.percent(),
        k.non_alerted_outcome_rate.percent()
    ));
    out.push_str(&format!(
        "  Portfolio Default Rate: {}\n",
        k.portfolio_outcome_rate.percent()
    ));
    for metric in [&k.alerted_outcome_rate, &k.non_alerted_outcome_rate] {
        if let Some(reason) = &metric.unavailable {
            out.push_str(&format!("  {DIM}n/a: {}{RESET}\n", reason));
        }
    }
    out.push('\n');

    // Risk bucket performance
    out.push_str(&format!("{BOLD}RISK BUCKET PERFORMANCE{RESET}\n"));
    out.push_str(&format!(
        "{DIM}  boundaries: Low <= {:.3} < Medium <= {:.3} < High{RESET}\n",
        report.boundaries.low_upper, report.boundaries.medium_upper
    ));
    let max_rate = report
        .segments
        .iter()
        .filter_map(|s| s.outcome_rate.value)
        .fold(0.0, f64::max);
    for s in &report.segments {
        let color = segment_color(&s.segment);
        match s.outcome_rate.value {
            Some(v) => out.push_str(&format!(
                "  {color}{:<12}{RESET} {:>7}  {color}{}{RESET} {DIM}({} loans){RESET}\n",
                s.label,
                format_percent(v),
                bar(v, max_rate),
                s.members
            )),
            None => out.push_str(&format!(
                "  {color}{:<12}{RESET} {:>7}  {DIM}{}{RESET}\n",
                s.label,
                "n/a",
                s.outcome_rate.unavailable.as_deref().unwrap_or("")
            )),
        }
    }
    out.push('\n');

    // Score distribution
    let h = &report.histogram;
    out.push_str(&format!("{BOLD}EWS SCORE DISTRIBUTION{RESET}\n"));
    let max_count = h.counts.iter().copied().max().unwrap_or(0) as f64;
    for (i, &count) in h.counts.iter().enumerate() {
        let marker = if h.threshold_bin == Some(i) {
            format!(" {BOLD}<- alert threshold{RESET}")
        } else {
            String::new()
        };
        out.push_str(&format!(
            "  {:>10.3} {:>6} {}{}\n",
            h.bin_start(i),
            count,
            bar(count as f64, max_count),
            marker
        ));
    }
    out.push('\n');

    // Flagged accounts
    out.push_str(&format!(
        "{BOLD}FLAGGED ACCOUNTS (TOP RISK){RESET} (showing {} of {})\n",
        report.flagged.len(),
        report.flagged_total
    ));
    if !report.flagged.is_empty() {
        out.push_str(&format!(
            "{DIM}  #    ID                 SCORE     OUTCOME  BUCKET{RESET}\n"
        ));
        for (i, f) in report.flagged.iter().enumerate() {
            out.push_str(&format!(
                "  {:<4} {:<18} {:>8.3}  {:<7}  {}{}{RESET}\n",
                i + 1,
                display_id(f),
                f.record.score,
                if f.record.outcome { "yes" } else { "no" },
                segment_color(&f.segment),
                f.segment.label()
            ));
        }
    }
    out.push('\n');

    out.push_str(&format!(
        "{DIM}Loans are ranked by Early Warning Score. The alert threshold follows\n\
         operational capacity; risk buckets are fixed 70/20/10 score tiers.{RESET}\n"
    ));

    Ok(out)
}

/// Render sweep results as a table
pub fn render_sweep(points: &[SweepPoint]) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("\n{BOLD}Alert Rate Sweep{RESET}\n"));
    out.push_str(&format!(
        "{DIM}  TARGET   THRESHOLD   REALIZED  ALERTED   DEFAULT(A)  DEFAULT(N){RESET}\n"
    ));
    for p in points {
        out.push_str(&format!(
            "  {:>6}  {:>10.3}  {:>9}  {:>7}  {:>11}  {:>10}\n",
            format_percent(p.target_rate),
            p.threshold,
            format_percent(p.realized_alert_rate),
            p.alerted,
            format_optional_percent(p.alerted_outcome_rate),
            format_optional_percent(p.non_alerted_outcome_rate)
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sweep;
    use crate::reporters::tests::{test_report, test_table};

    #[test]
    fn test_text_render_contains_sections() {
        let out = render(&test_report()).expect("render text");
        assert!(out.contains("Threshold (EWS score)"));
        assert!(out.contains("7.300"));
        assert!(out.contains("Alert Rate: 30.0%"));
        assert!(out.contains("RISK BUCKET PERFORMANCE"));
        assert!(out.contains("High Risk"));
        assert!(out.contains("<- alert threshold"));
        assert!(out.contains("L010"));
        assert!(out.contains("showing 3 of 3"));
    }

    #[test]
    fn test_text_render_unavailable_metric() {
        let mut report = test_report();
        report.kpis.alerted_outcome_rate.value = None;
        report.kpis.alerted_outcome_rate.unavailable = Some("no alerted records".into());
        let out = render(&report).expect("render text");
        assert!(out.contains("Default Rate (Alerted): n/a"));
        assert!(out.contains("no alerted records"));
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(1.0, 1.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(0.5, 1.0).chars().count(), BAR_WIDTH / 2);
        assert!(bar(1.0, 0.0).is_empty());
    }

    #[test]
    fn test_sweep_render() {
        let points = sweep(&test_table(), &[0.1, 0.3]).unwrap();
        let out = render_sweep(&points).expect("render sweep");
        assert!(out.contains("10.0%"));
        assert!(out.contains("30.0%"));
    }
}
