//! Core data models for the early-warning monitor
//!
//! A `RecordTable` is an immutable snapshot of scored accounts. Everything
//! else in the crate is derived from a table plus an `AlertConfig`.

use crate::error::{EwsError, EwsResult};
use serde::{Deserialize, Serialize};

/// One scored loan or account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// External identifier, if the source provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Early-warning score, higher = riskier
    pub score: f64,
    /// Observed outcome (e.g. defaulted within the horizon)
    pub outcome: bool,
}

impl Record {
    pub fn new(score: f64, outcome: bool) -> Self {
        Self {
            id: None,
            score,
            outcome,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Ordered, non-empty table of records with finite scores.
///
/// The table is never mutated after construction, so it can be shared
/// freely between evaluation runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordTable {
    records: Vec<Record>,
}

impl RecordTable {
    /// Build a table, rejecting empty input and non-finite scores.
    pub fn new(records: Vec<Record>) -> EwsResult<Self> {
        if records.is_empty() {
            return Err(EwsError::InvalidConfig(
                "record table is empty".to_string(),
            ));
        }
        if let Some((row, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| !r.score.is_finite())
        {
            return Err(EwsError::InvalidConfig(format!(
                "score at row {} is not finite ({})",
                row, record.score
            )));
        }
        Ok(Self { records })
    }

    /// Convenience constructor from parallel score/outcome columns.
    pub fn from_columns(scores: &[f64], outcomes: &[bool]) -> EwsResult<Self> {
        if scores.len() != outcomes.len() {
            return Err(EwsError::InvalidConfig(format!(
                "column length mismatch: {} scores vs {} outcomes",
                scores.len(),
                outcomes.len()
            )));
        }
        let records = scores
            .iter()
            .zip(outcomes)
            .map(|(&score, &outcome)| Record::new(score, outcome))
            .collect();
        Self::new(records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Score column in row order
    pub fn scores(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.score).collect()
    }

    /// Outcome column in row order
    pub fn outcomes(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.outcome).collect()
    }

    pub fn get(&self, row: usize) -> Option<&Record> {
        self.records.get(row)
    }
}

/// Operator-chosen alert capacity for one evaluation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlertConfig {
    target_rate: f64,
}

impl AlertConfig {
    /// Validate a target rate. Both ends of `[0, 1]` are rejected.
    pub fn new(target_rate: f64) -> EwsResult<Self> {
        validate_target_rate(target_rate)?;
        Ok(Self { target_rate })
    }

    pub fn target_rate(&self) -> f64 {
        self.target_rate
    }
}

pub(crate) fn validate_target_rate(target_rate: f64) -> EwsResult<()> {
    // NaN fails both comparisons
    if target_rate > 0.0 && target_rate < 1.0 {
        Ok(())
    } else {
        Err(EwsError::InvalidConfig(format!(
            "target rate must be strictly between 0 and 1, got {}",
            target_rate
        )))
    }
}

/// Fixed severity tier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskSegment {
    Low,
    Medium,
    High,
}

impl RiskSegment {
    pub fn all() -> &'static [RiskSegment] {
        &[RiskSegment::Low, RiskSegment::Medium, RiskSegment::High]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskSegment::Low => "Low Risk",
            RiskSegment::Medium => "Medium Risk",
            RiskSegment::High => "High Risk",
        }
    }

    /// Position in `all()`, usable as an array index
    pub fn index(&self) -> usize {
        match self {
            RiskSegment::Low => 0,
            RiskSegment::Medium => 1,
            RiskSegment::High => 2,
        }
    }
}

impl std::fmt::Display for RiskSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
