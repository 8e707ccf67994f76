//! Fixed-proportion risk segmentation
//!
//! Scores are split at the 0.70 and 0.90 quantiles (same interpolation as
//! the alert threshold):
//!
//! ```text
//! Low    = [min, q70]
//! Medium = (q70, q90]
//! High   = (q90, max]
//! ```
//!
//! A score equal to a boundary belongs to the lower tier, so ties at a
//! boundary are absorbed downwards. The four bin edges `min, q70, q90, max`
//! must be strictly increasing; a repeated edge is a degenerate distribution.
//! Distinct edges can still leave a tier without members (a run of ties just
//! below a boundary). The labels are returned as-is in that case and the
//! empty tier surfaces later as `EmptySubset` for that segment alone.

use crate::error::{EwsError, EwsResult};
use crate::models::RiskSegment;
use crate::quantile::{distinct_count, quantile, sorted_scores};
use serde::Serialize;

/// Cumulative fraction at the top of the Low tier
pub const LOW_UPPER: f64 = 0.70;
/// Cumulative fraction at the top of the Medium tier
pub const MEDIUM_UPPER: f64 = 0.90;

/// Minimum number of distinct scores needed for three tiers
const MIN_DISTINCT: usize = 3;

/// Boundary scores between the tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentBoundaries {
    /// Highest score still in Low
    pub low_upper: f64,
    /// Highest score still in Medium
    pub medium_upper: f64,
}

impl SegmentBoundaries {
    /// Compute boundaries for a score column.
    ///
    /// Fails on fewer than three distinct scores or on repeated bin edges.
    /// Tier occupancy is not checked.
    pub fn from_scores(scores: &[f64]) -> EwsResult<Self> {
        if scores.is_empty() {
            return Err(EwsError::InvalidConfig(
                "cannot segment an empty score column".to_string(),
            ));
        }
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(EwsError::InvalidConfig(
                "score column contains non-finite values".to_string(),
            ));
        }
        let sorted = sorted_scores(scores);
        let distinct = distinct_count(&sorted);
        if distinct < MIN_DISTINCT {
            return Err(EwsError::DegenerateDistribution(format!(
                "{} distinct score value(s), need at least {}",
                distinct, MIN_DISTINCT
            )));
        }
        // sorted is non-empty here, so both quantiles exist
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let low_upper = quantile(&sorted, LOW_UPPER).unwrap_or(min);
        let medium_upper = quantile(&sorted, MEDIUM_UPPER).unwrap_or(min);
        if low_upper == min || low_upper == medium_upper || medium_upper == max {
            return Err(EwsError::DegenerateDistribution(format!(
                "bin edges are not distinct (min {:.6}, q70 {:.6}, q90 {:.6}, max {:.6})",
                min, low_upper, medium_upper, max
            )));
        }
        Ok(Self {
            low_upper,
            medium_upper,
        })
    }

    /// Tier for one score
    pub fn assign(&self, score: f64) -> RiskSegment {
        if score <= self.low_upper {
            RiskSegment::Low
        } else if score <= self.medium_upper {
            RiskSegment::Medium
        } else {
            RiskSegment::High
        }
    }
}

/// Label every score with its risk tier, preserving input order.
pub fn segment(scores: &[f64]) -> EwsResult<Vec<RiskSegment>> {
    Ok(segment_with_boundaries(scores)?.1)
}

/// Like `segment`, also returning the boundaries used.
pub fn segment_with_boundaries(
    scores: &[f64],
) -> EwsResult<(SegmentBoundaries, Vec<RiskSegment>)> {
    let boundaries = SegmentBoundaries::from_scores(scores)?;
    let labels = scores.iter().map(|&s| boundaries.assign(s)).collect();
    Ok((boundaries, labels))
}

/// Member count per tier, indexed by `RiskSegment::index`
pub fn segment_counts(labels: &[RiskSegment]) -> [usize; 3] {
    let mut counts = [0usize; 3];
    for label in labels {
        counts[label.index()] += 1;
    }
    counts
}
