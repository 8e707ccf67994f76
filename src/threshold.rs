//! Alert threshold calculation
//!
//! The threshold is the score at the `1 - target_rate` quantile, so flagging
//! everything at or above it flags (at least) `target_rate` of the portfolio.

use crate::error::{EwsError, EwsResult};
use crate::models::validate_target_rate;
use crate::quantile::{quantile, sorted_scores};

/// Score cutoff for a target alert rate.
///
/// Fails with `InvalidConfig` when `scores` is empty, contains a non-finite
/// value, or `target_rate` is not strictly inside `(0, 1)`.
pub fn compute_threshold(scores: &[f64], target_rate: f64) -> EwsResult<f64> {
    validate_target_rate(target_rate)?;
    if scores.is_empty() {
        return Err(EwsError::InvalidConfig(
            "cannot compute a threshold over an empty score column".to_string(),
        ));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(EwsError::InvalidConfig(
            "score column contains non-finite values".to_string(),
        ));
    }
    let sorted = sorted_scores(scores);
    quantile(&sorted, 1.0 - target_rate).ok_or_else(|| {
        EwsError::InvalidConfig("cannot compute a threshold over an empty score column".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_to_ten() -> Vec<f64> {
        (1..=10).map(|i| i as f64).collect()
    }

    #[test]
    fn test_threshold_at_thirty_percent() {
        let t = compute_threshold(&one_to_ten(), 0.3).unwrap();
        assert!((t - 7.3).abs() < 1e-9);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut shuffled = one_to_ten();
        shuffled.reverse();
        shuffled.swap(2, 7);
        assert_eq!(
            compute_threshold(&shuffled, 0.25).unwrap(),
            compute_threshold(&one_to_ten(), 0.25).unwrap()
        );
    }

    #[test]
    fn test_boundary_rates_rejected() {
        for rate in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let err = compute_threshold(&one_to_ten(), rate).unwrap_err();
            assert!(matches!(err, EwsError::InvalidConfig(_)), "rate {rate}");
        }
    }

    #[test]
    fn test_empty_scores_rejected() {
        let err = compute_threshold(&[], 0.3).unwrap_err();
        assert!(matches!(err, EwsError::InvalidConfig(_)));
    }

    #[test]
    fn test_non_finite_scores_rejected() {
        let err = compute_threshold(&[1.0, f64::NAN, 3.0], 0.3).unwrap_err();
        assert!(matches!(err, EwsError::InvalidConfig(_)));
    }

    #[test]
    fn test_threshold_is_exact_quantile() {
        // 1 - 0.65 == 0.35 exactly; np.quantile([0.1, 0.2, 0.7], 0.35) == 0.17
        assert_eq!(compute_threshold(&[0.7, 0.1, 0.2], 0.65).unwrap(), 0.17);
    }

    #[test]
    fn test_threshold_decreases_as_rate_grows() {
        let scores = one_to_ten();
        let mut previous = f64::INFINITY;
        for pct in 1..100 {
            let t = compute_threshold(&scores, pct as f64 / 100.0).unwrap();
            assert!(t <= previous);
            previous = t;
        }
    }
}
