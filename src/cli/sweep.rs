//! Sweep command - every configured alert rate, evaluated in parallel

use super::emit;
use anyhow::{Context, Result};
use ews_monitor::config::ProjectConfig;
use ews_monitor::loader::load_csv;
use ews_monitor::pipeline::{rate_grid, sweep};
use ews_monitor::reporters::{report_sweep, OutputFormat};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Run the sweep command
pub fn run(data: &Path, config: &ProjectConfig, format: &str, output: Option<&Path>) -> Result<()> {
    let format = OutputFormat::from_str(format)?;
    let table = load_csv(data, &config.data)?;

    let rates = rate_grid(config.alert.min_rate, config.alert.max_rate, config.alert.step);
    info!("Sweeping {} alert rates over {} records", rates.len(), table.len());

    let points = sweep(&table, &rates)
        .with_context(|| format!("Sweep over {} failed", data.display()))?;
    let rendered = report_sweep(&points, format)?;
    emit(&rendered, output)
}
