//! Evaluation pipeline
//!
//! One run = one immutable `RecordTable` plus one `AlertConfig`. Changing the
//! alert rate means building a new config and running again; nothing is
//! updated in place, so runs over the same table can execute in parallel.

use crate::classify::classify;
use crate::error::EwsResult;
use crate::models::{AlertConfig, Record, RecordTable, RiskSegment};
use crate::segment::{segment, segment_with_boundaries, SegmentBoundaries};
use crate::stats::{aggregate, Statistics};
use crate::threshold::compute_threshold;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Everything derived from one `(table, config)` pair
#[derive(Debug, Clone)]
pub struct Evaluation<'a> {
    pub table: &'a RecordTable,
    pub config: AlertConfig,
    pub threshold: f64,
    pub flags: Vec<bool>,
    pub boundaries: SegmentBoundaries,
    pub segments: Vec<RiskSegment>,
    pub statistics: Statistics,
}

/// A flagged record, for the top-risk table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedRecord {
    /// Zero-based row in the source table
    pub row: usize,
    #[serde(flatten)]
    pub record: Record,
    pub segment: RiskSegment,
}

impl<'a> Evaluation<'a> {
    /// Run threshold, classification, segmentation and aggregation.
    pub fn run(table: &'a RecordTable, config: AlertConfig) -> EwsResult<Self> {
        let scores = table.scores();
        let threshold = compute_threshold(&scores, config.target_rate())?;
        let flags = classify(&scores, threshold);
        let (boundaries, segments) = segment_with_boundaries(&scores)?;
        let statistics = aggregate(table, &flags, &segments)?;

        debug!(
            target_rate = config.target_rate(),
            threshold,
            alerted = statistics.alert_rate.hits,
            records = table.len(),
            "evaluation complete"
        );

        Ok(Self {
            table,
            config,
            threshold,
            flags,
            boundaries,
            segments,
            statistics,
        })
    }

    /// Flagged records, riskiest first, at most `n`.
    ///
    /// Equal scores keep their table order.
    pub fn top_flagged(&self, n: usize) -> Vec<FlaggedRecord> {
        let mut flagged: Vec<FlaggedRecord> = self
            .table
            .records()
            .iter()
            .enumerate()
            .filter(|(row, _)| self.flags[*row])
            .map(|(row, record)| FlaggedRecord {
                row,
                record: record.clone(),
                segment: self.segments[row],
            })
            .collect();
        // stable sort keeps row order among ties
        flagged.sort_by(|a, b| b.record.score.total_cmp(&a.record.score));
        flagged.truncate(n);
        flagged
    }

    /// Equal-width histogram of the score column
    pub fn histogram(&self, bins: usize) -> ScoreHistogram {
        ScoreHistogram::build(&self.table.scores(), bins, Some(self.threshold))
    }
}

/// Headline numbers for one alert rate in a sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub target_rate: f64,
    pub threshold: f64,
    pub realized_alert_rate: f64,
    pub alerted: usize,
    /// `None` when no record is flagged
    pub alerted_outcome_rate: Option<f64>,
    /// `None` when every record is flagged
    pub non_alerted_outcome_rate: Option<f64>,
}

/// Evaluate several alert rates against one table in parallel.
///
/// Results come back in the order of `rates`. The first failing rate aborts
/// the sweep.
pub fn sweep(table: &RecordTable, rates: &[f64]) -> EwsResult<Vec<SweepPoint>> {
    let scores = table.scores();
    // Segments do not depend on the rate; every point shares one labelling
    let segments = segment(&scores)?;

    rates
        .par_iter()
        .map(|&rate| -> EwsResult<SweepPoint> {
            let config = AlertConfig::new(rate)?;
            let threshold = compute_threshold(&scores, config.target_rate())?;
            let flags = classify(&scores, threshold);
            let stats = aggregate(table, &flags, &segments)?;
            Ok(SweepPoint {
                target_rate: rate,
                threshold,
                realized_alert_rate: stats.alert_rate.value(),
                alerted: stats.alert_rate.hits,
                alerted_outcome_rate: stats.alerted_outcome_rate.as_ref().ok().map(|r| r.value()),
                non_alerted_outcome_rate: stats
                    .non_alerted_outcome_rate
                    .as_ref()
                    .ok()
                    .map(|r| r.value()),
            })
        })
        .collect()
}

/// Evenly spaced rates from `min` to `max` inclusive.
///
/// Rates are rounded to 1e-9 so a 0.05 step yields 0.3, not 0.30000000000000004.
pub fn rate_grid(min: f64, max: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || min > max {
        return Vec::new();
    }
    let count = ((max - min) / step + 1e-9).floor() as usize + 1;
    (0..count)
        .map(|i| ((min + step * i as f64) * 1e9).round() / 1e9)
        .collect()
}

/// Equal-width histogram over `[min, max]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreHistogram {
    pub min: f64,
    pub max: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
    /// Bin containing the alert threshold, if one was given
    pub threshold_bin: Option<usize>,
}

impl ScoreHistogram {
    /// Bin `scores` into `bins` equal-width bins; the last bin is closed.
    ///
    /// All-equal scores produce a single bin. `bins == 0` is treated as 1.
    pub fn build(scores: &[f64], bins: usize, threshold: Option<f64>) -> Self {
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if scores.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                bin_width: 0.0,
                counts: Vec::new(),
                threshold_bin: None,
            };
        }
        let span = max - min;
        let bins = if span > 0.0 { bins.max(1) } else { 1 };
        let bin_width = if span > 0.0 { span / bins as f64 } else { 0.0 };

        let index = |v: f64| -> usize {
            if bin_width == 0.0 {
                return 0;
            }
            (((v - min) / bin_width).floor() as usize).min(bins - 1)
        };

        let mut counts = vec![0usize; bins];
        for &s in scores {
            counts[index(s)] += 1;
        }
        let threshold_bin = threshold
            .filter(|t| *t >= min && *t <= max)
            .map(index);

        Self {
            min,
            max,
            bin_width,
            counts,
            threshold_bin,
        }
    }

    /// Lower edge of bin `i`
    pub fn bin_start(&self, i: usize) -> f64 {
        self.min + self.bin_width * i as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EwsError, Subset};

    fn scenario_table() -> RecordTable {
        let records = (1..=10)
            .map(|i| Record::new(i as f64, i >= 8).with_id(format!("L{:03}", i)))
            .collect();
        RecordTable::new(records).unwrap()
    }

    #[test]
    fn test_run_thirty_percent() {
        let table = scenario_table();
        let eval = Evaluation::run(&table, AlertConfig::new(0.3).unwrap()).unwrap();
        assert!((eval.threshold - 7.3).abs() < 1e-9);
        assert_eq!(eval.flags.iter().filter(|f| **f).count(), 3);
        assert_eq!(eval.segments.len(), 10);
        assert!(eval.statistics.is_complete());
    }

    #[test]
    fn test_run_is_repeatable() {
        let table = scenario_table();
        let config = AlertConfig::new(0.25).unwrap();
        let a = Evaluation::run(&table, config).unwrap();
        let b = Evaluation::run(&table, config).unwrap();
        assert_eq!(a.flags, b.flags);
        assert_eq!(a.threshold, b.threshold);
        assert_eq!(a.statistics, b.statistics);
    }

    #[test]
    fn test_degenerate_table_fails_run() {
        let table = RecordTable::from_columns(&[0.5; 10], &[false; 10]).unwrap();
        let err = Evaluation::run(&table, AlertConfig::new(0.3).unwrap()).unwrap_err();
        assert!(matches!(err, EwsError::DegenerateDistribution(_)));
    }

    #[test]
    fn test_empty_tier_keeps_the_rest_of_the_run() {
        // q70 = 5.0, q90 = 5.4: nothing lands in Medium
        let scores = [1.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 9.0];
        let outcomes = [false, false, false, false, false, false, false, true, false, true];
        let table = RecordTable::from_columns(&scores, &outcomes).unwrap();
        let eval = Evaluation::run(&table, AlertConfig::new(0.3).unwrap()).unwrap();

        assert_eq!(eval.threshold, 5.0);
        let stats = &eval.statistics;
        assert_eq!(stats.alert_rate.hits, 9);
        assert_eq!(stats.alerted_outcome_rate.as_ref().unwrap().hits, 2);
        assert_eq!(stats.non_alerted_outcome_rate.as_ref().unwrap().hits, 0);

        assert_eq!(
            stats.segment(RiskSegment::Medium).unwrap().outcome_rate,
            Err(EwsError::EmptySubset(Subset::Segment(RiskSegment::Medium)))
        );
        let low = stats.segment(RiskSegment::Low).unwrap();
        assert_eq!(low.members, 9);
        assert_eq!(low.outcome_rate.as_ref().unwrap().hits, 1);
        let high = stats.segment(RiskSegment::High).unwrap();
        assert_eq!(high.outcome_rate.as_ref().unwrap().value(), 1.0);
        assert!(!stats.is_complete());
    }

    #[test]
    fn test_sweep_survives_an_empty_tier() {
        let scores = [1.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 9.0];
        let table = RecordTable::from_columns(&scores, &[false; 10]).unwrap();
        let points = sweep(&table, &[0.1, 0.3]).unwrap();
        assert_eq!(points[0].alerted, 1);
        assert_eq!(points[1].alerted, 9);
    }

    #[test]
    fn test_top_flagged_sorted_descending() {
        let table = scenario_table();
        let eval = Evaluation::run(&table, AlertConfig::new(0.3).unwrap()).unwrap();
        let top = eval.top_flagged(50);
        let scores: Vec<f64> = top.iter().map(|f| f.record.score).collect();
        assert_eq!(scores, vec![10.0, 9.0, 8.0]);
        assert_eq!(top[0].record.id.as_deref(), Some("L010"));
        assert_eq!(top[0].segment, RiskSegment::High);

        assert_eq!(eval.top_flagged(2).len(), 2);
    }

    #[test]
    fn test_top_flagged_ties_keep_row_order() {
        let scores = [1.0, 9.0, 2.0, 9.0, 3.0, 4.0, 5.0, 6.0, 7.0, 10.0];
        let table = RecordTable::from_columns(&scores, &[false; 10]).unwrap();
        let eval = Evaluation::run(&table, AlertConfig::new(0.2).unwrap()).unwrap();
        let rows: Vec<usize> = eval.top_flagged(10).iter().map(|f| f.row).collect();
        assert_eq!(rows, vec![9, 1, 3]);
    }

    #[test]
    fn test_sweep_preserves_order_and_monotonicity() {
        let table = scenario_table();
        let rates = rate_grid(0.10, 0.50, 0.05);
        let points = sweep(&table, &rates).unwrap();
        assert_eq!(points.len(), rates.len());
        for pair in points.windows(2) {
            assert!(pair[0].target_rate < pair[1].target_rate);
            assert!(pair[0].threshold >= pair[1].threshold);
            assert!(pair[0].realized_alert_rate <= pair[1].realized_alert_rate);
        }
    }

    #[test]
    fn test_sweep_rejects_invalid_rate() {
        let table = scenario_table();
        let err = sweep(&table, &[0.2, 1.0]).unwrap_err();
        assert!(matches!(err, EwsError::InvalidConfig(_)));
    }

    #[test]
    fn test_rate_grid() {
        let grid = rate_grid(0.10, 0.50, 0.05);
        assert_eq!(grid.len(), 9);
        assert_eq!(grid[0], 0.1);
        assert_eq!(grid[4], 0.3);
        assert_eq!(grid[8], 0.5);
        assert!(rate_grid(0.5, 0.1, 0.05).is_empty());
        assert!(rate_grid(0.1, 0.5, 0.0).is_empty());
    }

    #[test]
    fn test_histogram_counts_everything() {
        let scores: Vec<f64> = (0..=100).map(|i| i as f64).collect();
        let hist = ScoreHistogram::build(&scores, 10, Some(70.0));
        assert_eq!(hist.counts.len(), 10);
        assert_eq!(hist.counts.iter().sum::<usize>(), 101);
        // max lands in the closed last bin
        assert_eq!(hist.counts[9], 11);
        assert_eq!(hist.threshold_bin, Some(7));
        assert_eq!(hist.bin_start(5), 50.0);
    }

    #[test]
    fn test_histogram_constant_scores() {
        let hist = ScoreHistogram::build(&[2.0; 5], 50, Some(2.0));
        assert_eq!(hist.counts, vec![5]);
        assert_eq!(hist.threshold_bin, Some(0));
    }
}
