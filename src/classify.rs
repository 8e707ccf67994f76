//! Alert classification

/// Flag every score at or above `threshold`, preserving input order.
///
/// Ties with the threshold are flagged, so the realized alert rate can
/// exceed the target when many records share the boundary score.
pub fn classify(scores: &[f64], threshold: f64) -> Vec<bool> {
    scores.iter().map(|&s| s >= threshold).collect()
}

/// Fraction of flags that are set. `None` for an empty slice.
pub fn realized_rate(flags: &[bool]) -> Option<f64> {
    if flags.is_empty() {
        return None;
    }
    let alerted = flags.iter().filter(|&&f| f).count();
    Some(alerted as f64 / flags.len() as f64)
}
