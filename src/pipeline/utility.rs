//! Shared numeric helpers.

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the sample standard deviation (ddof = 1) given a
/// pre-computed mean. Returns 0.0 when fewer than two values exist,
/// which callers treat with the same zero-variance guard.
pub fn sample_stddev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

/// Min-max normalizes values into [0, 1] across the whole slice.
///
/// A zero-variance column (min == max) normalizes to 0.0 for every row
/// rather than propagating NaN from the zero denominator.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|v| if range > 0.0 { (v - min) / range } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[10.0, 10.0, 10.0, 10.0, 90.0]), 26.0);
    }

    #[test]
    fn test_sample_stddev_short_history_is_zero() {
        assert_eq!(sample_stddev(&[], 0.0), 0.0);
        assert_eq!(sample_stddev(&[42.0], 42.0), 0.0);
    }

    #[test]
    fn test_sample_stddev_basic() {
        let values = [10.0, 10.0, 10.0, 10.0, 90.0];
        let m = mean(&values);
        // sum of squared deviations = 5120, ddof 1 -> variance 1280
        let sd = sample_stddev(&values, m);
        assert!((sd - 1280.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_min_max_endpoints() {
        let normed = min_max_normalize(&[5.0, 10.0, 20.0]);
        assert_eq!(normed[0], 0.0);
        assert_eq!(normed[2], 1.0);
        assert!((normed[1] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_max_zero_variance_is_zero() {
        assert_eq!(min_max_normalize(&[7.0, 7.0, 7.0]), vec![0.0, 0.0, 0.0]);
    }
}
