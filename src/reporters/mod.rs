//! Output reporters for evaluation results
//!
//! Supports multiple output formats:
//! - `text` - Terminal dashboard with colors and ASCII bars
//! - `json` - Machine-readable JSON
//! - `markdown` - GitHub-flavored Markdown

mod json;
mod markdown;
mod text;

use crate::error::EwsResult;
use crate::models::RiskSegment;
use crate::pipeline::{Evaluation, FlaggedRecord, ScoreHistogram, SweepPoint};
use crate::segment::SegmentBoundaries;
use crate::stats::Rate;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// A rate ready for display. `value` is `None` when the subset was empty,
/// with the reason in `unavailable`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub value: Option<f64>,
    pub hits: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable: Option<String>,
}

impl Metric {
    fn from_rate(rate: &Rate) -> Self {
        Self {
            value: Some(rate.value()),
            hits: rate.hits,
            total: rate.total,
            unavailable: None,
        }
    }

    fn from_result(result: &EwsResult<Rate>) -> Self {
        match result {
            Ok(rate) => Self::from_rate(rate),
            Err(e) => Self {
                value: None,
                hits: 0,
                total: 0,
                unavailable: Some(e.to_string()),
            },
        }
    }

    /// Percentage with one decimal, or "n/a"
    pub fn percent(&self) -> String {
        match self.value {
            Some(v) => format_percent(v),
            None => "n/a".to_string(),
        }
    }
}

/// Headline KPIs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub alert_rate: Metric,
    pub alerted_outcome_rate: Metric,
    pub non_alerted_outcome_rate: Metric,
    pub portfolio_outcome_rate: Metric,
}

/// Outcome rate of one risk bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentReport {
    pub segment: RiskSegment,
    pub label: &'static str,
    pub members: usize,
    pub outcome_rate: Metric,
}

/// Serializable snapshot of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub records: usize,
    pub target_rate: f64,
    pub threshold: f64,
    pub kpis: Kpis,
    pub boundaries: SegmentBoundaries,
    pub segments: Vec<SegmentReport>,
    pub histogram: ScoreHistogram,
    /// Total flagged records (the table below may be truncated)
    pub flagged_total: usize,
    pub flagged: Vec<FlaggedRecord>,
}

impl DashboardReport {
    /// Build the report for an evaluation.
    pub fn from_evaluation(eval: &Evaluation<'_>, top_n: usize, histogram_bins: usize) -> Self {
        let stats = &eval.statistics;
        Self {
            source: None,
            records: eval.table.len(),
            target_rate: eval.config.target_rate(),
            threshold: eval.threshold,
            kpis: Kpis {
                alert_rate: Metric::from_rate(&stats.alert_rate),
                alerted_outcome_rate: Metric::from_result(&stats.alerted_outcome_rate),
                non_alerted_outcome_rate: Metric::from_result(&stats.non_alerted_outcome_rate),
                portfolio_outcome_rate: Metric::from_rate(&stats.portfolio_outcome_rate),
            },
            boundaries: eval.boundaries,
            segments: stats
                .segments
                .iter()
                .map(|s| SegmentReport {
                    segment: s.segment,
                    label: s.segment.label(),
                    members: s.members,
                    outcome_rate: Metric::from_result(&s.outcome_rate),
                })
                .collect(),
            histogram: eval.histogram(histogram_bins),
            flagged_total: stats.alert_rate.hits,
            flagged: eval.top_flagged(top_n),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Render a dashboard report in the specified format
pub fn report(report: &DashboardReport, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt)
}

/// Render a dashboard report using an OutputFormat enum
pub fn report_with_format(report: &DashboardReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => markdown::render(report),
    }
}

/// Render sweep results
pub fn report_sweep(points: &[SweepPoint], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_sweep(points),
        OutputFormat::Json => json::render_sweep(points),
        OutputFormat::Markdown => markdown::render_sweep(points),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    }
}

pub(crate) fn format_percent(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

pub(crate) fn format_optional_percent(v: Option<f64>) -> String {
    v.map(format_percent).unwrap_or_else(|| "n/a".to_string())
}

/// Row identifier: the record id, or the 1-based row number
pub(crate) fn display_id(flagged: &FlaggedRecord) -> String {
    flagged
        .record
        .id
        .clone()
        .unwrap_or_else(|| format!("#{}", flagged.row + 1))
}
