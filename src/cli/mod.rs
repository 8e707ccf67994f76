//! CLI command definitions and handlers

mod evaluate;
mod init;
mod sweep;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use ews_monitor::config::{load_project_config, ProjectConfig};
use std::path::{Path, PathBuf};

/// Parse an alert rate given either as a fraction (0.3) or a percentage (30, 30%).
///
/// A bare number is a percentage only above 1, so `1` is a rate of 1 and is
/// rejected; `1%` is one percent.
fn parse_rate(s: &str) -> Result<f64, String> {
    let (digits, percent) = match s.strip_suffix('%') {
        Some(rest) => (rest, true),
        None => (s, false),
    };
    let v: f64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    let rate = if percent || v > 1.0 { v / 100.0 } else { v };
    if rate > 0.0 && rate < 1.0 {
        Ok(rate)
    } else {
        Err(format!("alert rate must be strictly between 0 and 1 (or 0-100%), got {}", s))
    }
}

/// EWS Monitor - early-warning alert thresholds for credit portfolios
#[derive(Parser, Debug)]
#[command(name = "ews")]
#[command(
    version,
    about = "Early-warning credit risk monitor: alert thresholds, risk buckets and outcome rates from precomputed EWS scores",
    after_help = "\
Examples:
  ews evaluate ews_scores.csv                  Evaluate at the configured default rate
  ews evaluate ews_scores.csv --rate 0.2       Flag 20% of the portfolio
  ews evaluate ews_scores.csv -f json          JSON output for scripting
  ews sweep ews_scores.csv                     Compare every rate on the configured grid
  ews init .                                   Write an example ews.toml"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: ews.toml next to the data file)
    #[arg(long, global = true, env = "EWS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate one alert rate and render the dashboard
    Evaluate {
        /// CSV file with scored records
        data: PathBuf,

        /// Alert rate as a fraction (0.3) or percent (30 or 30%); bare values above 1 are percent; must lie in the configured range
        #[arg(long, short = 'r', value_parser = parse_rate)]
        rate: Option<f64>,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Rows in the flagged-accounts table (default from config)
        #[arg(long)]
        top: Option<usize>,

        /// Histogram bins (default from config)
        #[arg(long)]
        bins: Option<usize>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Evaluate every alert rate on the configured grid in parallel
    Sweep {
        /// CSV file with scored records
        data: PathBuf,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Write an example ews.toml
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing ews.toml
        #[arg(long)]
        force: bool,
    },
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Evaluate {
            data,
            rate,
            format,
            top,
            bins,
            output,
        } => {
            let config = config_for(cli.config.as_deref(), &data)?;
            evaluate::run(&data, &config, rate, &format, top, bins, output.as_deref())
        }
        Commands::Sweep {
            data,
            format,
            output,
        } => {
            let config = config_for(cli.config.as_deref(), &data)?;
            sweep::run(&data, &config, &format, output.as_deref())
        }
        Commands::Init { dir, force } => init::run(&dir, force),
    }
}

/// Load config from `--config`, or from the data file's directory
fn config_for(explicit: Option<&Path>, data: &Path) -> Result<ProjectConfig> {
    let dir = data
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    load_project_config(explicit, dir)
}

/// Print to stdout, or write to `output` and say so on stderr
fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
