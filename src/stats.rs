//! Portfolio and per-segment outcome statistics
//!
//! Every statistic is a ratio of two counts. A rate whose denominator subset
//! is empty is reported as `EmptySubset` for that entry alone; the other
//! entries are still computed.

use crate::error::{EwsError, EwsResult, Subset};
use crate::models::{RecordTable, RiskSegment};
use serde::Serialize;

/// Ratio of two record counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rate {
    /// Records matching the numerator condition
    pub hits: usize,
    /// Records in the subset
    pub total: usize,
}

impl Rate {
    /// Build a rate over `subset`; fails if the subset is empty.
    pub fn over(hits: usize, total: usize, subset: Subset) -> EwsResult<Self> {
        if total == 0 {
            return Err(EwsError::EmptySubset(subset));
        }
        Ok(Self { hits, total })
    }

    pub fn value(&self) -> f64 {
        self.hits as f64 / self.total as f64
    }
}

/// Outcome rate of one risk segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentStat {
    pub segment: RiskSegment,
    pub members: usize,
    pub outcome_rate: EwsResult<Rate>,
}

/// Aggregate statistics for one evaluation run
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// Flagged records over all records
    pub alert_rate: Rate,
    /// Positive outcomes over all records
    pub portfolio_outcome_rate: Rate,
    /// Positive outcomes among flagged records
    pub alerted_outcome_rate: EwsResult<Rate>,
    /// Positive outcomes among unflagged records
    pub non_alerted_outcome_rate: EwsResult<Rate>,
    /// One entry per segment, Low to High
    pub segments: Vec<SegmentStat>,
}

impl Statistics {
    pub fn segment(&self, segment: RiskSegment) -> Option<&SegmentStat> {
        self.segments.iter().find(|s| s.segment == segment)
    }

    /// True when every entry could be computed
    pub fn is_complete(&self) -> bool {
        self.alerted_outcome_rate.is_ok()
            && self.non_alerted_outcome_rate.is_ok()
            && self.segments.iter().all(|s| s.outcome_rate.is_ok())
    }
}

#[derive(Default, Clone, Copy)]
struct Tally {
    members: usize,
    outcomes: usize,
}

impl Tally {
    fn add(&mut self, outcome: bool) {
        self.members += 1;
        if outcome {
            self.outcomes += 1;
        }
    }
}

/// Compute statistics from a table and its derived flag/segment columns.
///
/// `flags` and `segments` must be row-aligned with `table`.
pub fn aggregate(
    table: &RecordTable,
    flags: &[bool],
    segments: &[RiskSegment],
) -> EwsResult<Statistics> {
    let n = table.len();
    if flags.len() != n || segments.len() != n {
        return Err(EwsError::InvalidConfig(format!(
            "column length mismatch: {} records, {} flags, {} segments",
            n,
            flags.len(),
            segments.len()
        )));
    }

    let mut all = Tally::default();
    let mut alerted = Tally::default();
    let mut non_alerted = Tally::default();
    let mut by_segment = [Tally::default(); 3];

    for ((record, &flag), segment) in table.records().iter().zip(flags).zip(segments) {
        all.add(record.outcome);
        if flag {
            alerted.add(record.outcome);
        } else {
            non_alerted.add(record.outcome);
        }
        by_segment[segment.index()].add(record.outcome);
    }

    let segments = RiskSegment::all()
        .iter()
        .map(|&segment| {
            let tally = by_segment[segment.index()];
            SegmentStat {
                segment,
                members: tally.members,
                outcome_rate: Rate::over(tally.outcomes, tally.members, Subset::Segment(segment)),
            }
        })
        .collect();

    Ok(Statistics {
        alert_rate: Rate {
            hits: alerted.members,
            total: all.members,
        },
        portfolio_outcome_rate: Rate {
            hits: all.outcomes,
            total: all.members,
        },
        alerted_outcome_rate: Rate::over(alerted.outcomes, alerted.members, Subset::Alerted),
        non_alerted_outcome_rate: Rate::over(
            non_alerted.outcomes,
            non_alerted.members,
            Subset::NonAlerted,
        ),
        segments,
    })
}
