//! Linear-interpolation ("type 7") sample quantile
//!
//! ```text
//! h  = (n - 1) * p
//! lo = floor(h),  g = h - lo
//! Q(p) = lerp(x[lo], x[lo + 1], g)
//! ```
//!
//! The lerp is evaluated from whichever end is closer:
//! `a + (b - a) * g` for `g < 0.5`, `b - (b - a) * (1 - g)` otherwise.
//! This is the formulation NumPy uses for its `linear` method, so thresholds
//! match reference outputs produced there to the last bit.

use std::cmp::Ordering;

/// Sort a copy of `values` ascending.
///
/// Uses the IEEE total order, so the result is deterministic for any input.
pub fn sorted_scores(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of an ascending, non-empty slice at cumulative fraction `p`.
///
/// `p` is clamped to `[0, 1]`. Callers are responsible for validating
/// non-emptiness; an empty slice returns `None`.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    if lo + 1 >= n {
        return Some(sorted[n - 1]);
    }
    let g = h - lo as f64;
    Some(lerp(sorted[lo], sorted[lo + 1], g))
}

fn lerp(a: f64, b: f64, g: f64) -> f64 {
    let diff = b - a;
    if g < 0.5 {
        a + diff * g
    } else {
        b - diff * (1.0 - g)
    }
}

/// Number of distinct values in an ascending slice
pub fn distinct_count(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted
        .windows(2)
        .filter(|w| w[0].total_cmp(&w[1]) != Ordering::Equal)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_to_ten() -> Vec<f64> {
        (1..=10).map(|i| i as f64).collect()
    }

    #[test]
    fn test_interpolates_between_order_statistics() {
        let s = one_to_ten();
        assert!((quantile(&s, 0.7).unwrap() - 7.3).abs() < 1e-12);
        assert!((quantile(&s, 0.9).unwrap() - 9.1).abs() < 1e-12);
        assert!((quantile(&s, 0.5).unwrap() - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_endpoints_are_min_and_max() {
        let s = one_to_ten();
        assert_eq!(quantile(&s, 0.0), Some(1.0));
        assert_eq!(quantile(&s, 1.0), Some(10.0));
    }

    #[test]
    fn test_single_element() {
        assert_eq!(quantile(&[4.2], 0.3), Some(4.2));
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_exact_rank_hits_order_statistic() {
        // (5 - 1) * 0.25 = 1.0 exactly
        let s = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(quantile(&s, 0.25), Some(20.0));
    }

    #[test]
    fn test_upper_half_lerp_is_monotone_at_ties() {
        // Equal neighbours must give the tied value exactly, from either side
        let s = [1.0, 3.0, 3.0, 3.0, 9.0];
        assert_eq!(quantile(&s, 0.3), Some(3.0));
        assert_eq!(quantile(&s, 0.7), Some(3.0));
    }

    #[test]
    fn test_matches_numpy_linear_bit_for_bit() {
        // np.quantile([0.1, 0.2, 0.7], p) for the same p, compared exactly
        let s = [0.1, 0.2, 0.7];
        assert_eq!(quantile(&s, 0.3), Some(0.16));
        assert_eq!(quantile(&s, 0.85), Some(0.5499999999999999));
        // g < 0.5: `b - (b - a) * (1 - g)` would give 0.12 and 0.39999999999999997
        assert_eq!(quantile(&s, 0.1), Some(0.12000000000000001));
        assert_eq!(quantile(&s, 0.7), Some(0.3999999999999999));
        // g >= 0.5: `a + (b - a) * g` would give 0.16999999999999998 and 0.28
        assert_eq!(quantile(&s, 0.35), Some(0.17));
        assert_eq!(quantile(&[0.1, 0.3, 0.7], 0.45), Some(0.27999999999999997));
    }

    #[test]
    fn test_sorted_scores_and_distinct_count() {
        let s = sorted_scores(&[3.0, 1.0, 2.0, 1.0]);
        assert_eq!(s, vec![1.0, 1.0, 2.0, 3.0]);
        assert_eq!(distinct_count(&s), 3);
        assert_eq!(distinct_count(&[]), 0);
        assert_eq!(distinct_count(&[5.0; 10]), 1);
    }
}
