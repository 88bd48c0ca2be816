//! Differencing utilities for ARIMA models.

use crate::utils::stats::safe_ratio;

/// First-order differences of a series.
///
/// # Returns
/// `series[i] - series[i - 1]` for every `i ≥ 1`; empty for fewer than two
/// values.
pub fn difference(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Lag-1 autocorrelation ratio `Σ x_t x_{t-1} / Σ x_{t-1}²`, clamped to
/// `[-bound, bound]`.
///
/// Returns `0.0` when the denominator is degenerate.
pub fn lag1_ratio(series: &[f64], bound: f64) -> f64 {
    let (numerator, denominator) = series
        .windows(2)
        .fold((0.0, 0.0), |(num, den), w| (num + w[1] * w[0], den + w[0] * w[0]));
    safe_ratio(numerator, denominator).clamp(-bound, bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_difference() {
        assert_eq!(difference(&[1.0, 3.0, 6.0, 10.0]), vec![2.0, 3.0, 4.0]);
        assert!(difference(&[5.0]).is_empty());
        assert!(difference(&[]).is_empty());
    }

    #[test]
    fn test_lag1_ratio() {
        // (2*1 + 4*2) / (1 + 4) = 2, clamped
        assert_relative_eq!(lag1_ratio(&[1.0, 2.0, 4.0], 0.9), 0.9, epsilon = 1e-12);
        // (1*2 + 1*1) / (4 + 1) = 0.6
        assert_relative_eq!(lag1_ratio(&[2.0, 1.0, 1.0], 0.9), 0.6, epsilon = 1e-12);
        assert_eq!(lag1_ratio(&[0.0, 0.0, 0.0], 0.9), 0.0);
        assert_eq!(lag1_ratio(&[3.0], 0.9), 0.0);
    }
}
