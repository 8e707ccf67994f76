//! EWS Monitor - early-warning alert thresholds for credit portfolios
//!
//! Turns precomputed early-warning scores into an alert threshold for a
//! chosen portfolio capacity, fixed risk buckets, and outcome rates that
//! show how well the flags separate good and bad loans.

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --log-level; logs go to stderr so stdout stays parseable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
