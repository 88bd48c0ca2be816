//! Statistical utility functions.
//!
//! Everything here returns a neutral `0.0` rather than NaN on degenerate
//! input, so callers can chain results without guarding every step.

/// Sums of squares below this are treated as zero.
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// Approximate quantile function for standard normal distribution.
///
/// Uses the Abramowitz and Stegun approximation (formula 26.2.23).
///
/// # Example
/// ```
/// use coverage_forecast::utils::quantile_normal;
///
/// // 95% two-sided level -> z ≈ 1.96
/// let z = quantile_normal(0.975);
/// assert!((z - 1.96).abs() < 0.01);
/// ```
pub fn quantile_normal(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let t = if p < 0.5 {
        (-2.0 * p.ln()).sqrt()
    } else {
        (-2.0 * (1.0 - p).ln()).sqrt()
    };

    let c0 = 2.515517;
    let c1 = 0.802853;
    let c2 = 0.010328;
    let d1 = 1.432788;
    let d2 = 0.189269;
    let d3 = 0.001308;

    let result = t - (c0 + c1 * t + c2 * t * t) / (1.0 + d1 * t + d2 * t * t + d3 * t * t * t);

    if p < 0.5 {
        -result
    } else {
        result
    }
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (n denominator); `0.0` for fewer than two values.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn population_std_dev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Coefficient of determination of `predicted` against `actual`.
///
/// Returns `0.0` when lengths differ, fewer than two points are given, or
/// `actual` has no variance.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.len() < 2 {
        return 0.0;
    }
    let m = mean(actual);
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - m).powi(2)).sum();
    ratio_r_squared(ss_res, ss_tot)
}

/// `1 - ss_res / ss_tot`, or `0.0` when `ss_tot` is degenerate.
pub fn ratio_r_squared(ss_res: f64, ss_tot: f64) -> f64 {
    if ss_tot.abs() < DEGENERATE_EPSILON {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    }
}

/// Division that yields `0.0` for a degenerate denominator.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < DEGENERATE_EPSILON {
        0.0
    } else {
        numerator / denominator
    }
}

/// Round to one decimal place.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quantile_normal_known_values() {
        assert_relative_eq!(quantile_normal(0.5), 0.0, epsilon = 0.01);
        assert_relative_eq!(quantile_normal(0.975), 1.96, epsilon = 0.01);
        assert_relative_eq!(quantile_normal(0.025), -1.96, epsilon = 0.01);
        assert_relative_eq!(quantile_normal(0.995), 2.576, epsilon = 0.01);
    }

    #[test]
    fn quantile_normal_boundary_values() {
        assert_eq!(quantile_normal(0.0), f64::NEG_INFINITY);
        assert_eq!(quantile_normal(1.0), f64::INFINITY);
    }

    #[test]
    fn mean_falls_back_to_zero() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn population_variance_uses_n_denominator() {
        // deviations from 1.75: 0.25, -0.75, 0.25, 0.25
        assert_relative_eq!(
            population_variance(&[2.0, 1.0, 2.0, 2.0]),
            0.1875,
            epsilon = 1e-12
        );
        assert_eq!(population_variance(&[4.0]), 0.0);
        assert_relative_eq!(
            population_std_dev(&[2.0, 1.0, 2.0, 2.0]),
            0.1875_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn r_squared_perfect_and_degenerate() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(r_squared(&actual, &actual), 1.0, epsilon = 1e-12);
        assert_eq!(r_squared(&[5.0, 5.0, 5.0], &[4.0, 5.0, 6.0]), 0.0);
        assert_eq!(r_squared(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn safe_ratio_guards_zero() {
        assert_eq!(safe_ratio(3.0, 0.0), 0.0);
        assert_relative_eq!(safe_ratio(3.0, 2.0), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn round_tenth_rounds_half_up_for_positive_values() {
        assert_relative_eq!(round_tenth(88.25), 88.3, epsilon = 1e-9);
        assert_relative_eq!(round_tenth(88.24), 88.2, epsilon = 1e-9);
        assert_relative_eq!(round_tenth(0.0), 0.0, epsilon = 1e-12);
    }
}
