//! Error types for the threshold and segmentation engine
//!
//! Every variant describes a data-shape condition, not a logic fault.
//! Callers decide whether to drop one statistic or refuse the whole run.

use crate::models::RiskSegment;
use serde::Serialize;
use thiserror::Error;

/// Subset of the table whose size is the denominator of a rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subset {
    /// Records at or above the alert threshold
    Alerted,
    /// Records below the alert threshold
    NonAlerted,
    /// Records in one risk segment
    Segment(RiskSegment),
}

impl std::fmt::Display for Subset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subset::Alerted => write!(f, "alerted records"),
            Subset::NonAlerted => write!(f, "non-alerted records"),
            Subset::Segment(segment) => write!(f, "{} segment", segment),
        }
    }
}

/// Errors raised by the core computations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EwsError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Degenerate score distribution: {0}")]
    DegenerateDistribution(String),

    #[error("Empty subset: no {0} to compute a rate over")]
    EmptySubset(Subset),
}

pub type EwsResult<T> = Result<T, EwsError>;
