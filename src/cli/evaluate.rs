//! Evaluate command - one alert rate against one scored table

use super::emit;
use anyhow::{Context, Result};
use ews_monitor::config::ProjectConfig;
use ews_monitor::loader::load_csv;
use ews_monitor::models::AlertConfig;
use ews_monitor::pipeline::Evaluation;
use ews_monitor::reporters::{report, DashboardReport};
use std::path::Path;
use tracing::info;

/// Run the evaluate command
pub fn run(
    data: &Path,
    config: &ProjectConfig,
    rate: Option<f64>,
    format: &str,
    top: Option<usize>,
    bins: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    let rate = config.resolve_rate(rate)?;
    let table = load_csv(data, &config.data)?;

    let eval = Evaluation::run(&table, AlertConfig::new(rate)?)
        .with_context(|| format!("Evaluation of {} failed", data.display()))?;
    info!(
        "Alert threshold {:.3} flags {} of {} records",
        eval.threshold,
        eval.statistics.alert_rate.hits,
        table.len()
    );

    let dashboard = DashboardReport::from_evaluation(
        &eval,
        top.unwrap_or(config.report.top_n),
        bins.unwrap_or(config.report.histogram_bins),
    )
    .with_source(data.display().to_string());

    let rendered = report(&dashboard, format)?;
    emit(&rendered, output)
}
