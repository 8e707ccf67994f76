//! Alert-threshold and risk-segmentation engine for early-warning scores
//!
//! Given a table of scored accounts with observed outcomes and an operator
//! alert rate, computes:
//!
//! - the score threshold at the `1 - rate` quantile (`threshold`)
//! - a per-record alert flag, `score >= threshold` (`classify`)
//! - a fixed 70/20/10 Low/Medium/High segmentation (`segment`)
//! - alert and outcome rates overall and per segment (`stats`)
//!
//! All of these are pure functions of the table and the rate. `pipeline`
//! composes them into one run; `loader`, `config` and `reporters` are the
//! outer layers used by the `ews` binary.
//!
//! # Example
//!
//! ```
//! use ews_monitor::models::{AlertConfig, RecordTable};
//! use ews_monitor::pipeline::Evaluation;
//!
//! let scores: Vec<f64> = (1..=10).map(|i| i as f64).collect();
//! let outcomes: Vec<bool> = (1..=10).map(|i| i >= 8).collect();
//! let table = RecordTable::from_columns(&scores, &outcomes)?;
//!
//! let eval = Evaluation::run(&table, AlertConfig::new(0.3)?)?;
//! assert!((eval.threshold - 7.3).abs() < 1e-9);
//! assert_eq!(eval.statistics.alert_rate.hits, 3);
//! # Ok::<(), ews_monitor::error::EwsError>(())
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod quantile;
pub mod reporters;
pub mod segment;
pub mod stats;
pub mod threshold;

pub use error::{EwsError, EwsResult, Subset};
