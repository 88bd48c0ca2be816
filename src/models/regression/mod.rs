//! Regression estimators over calendar years.
//!
//! Line-based models fit `value = intercept + slope × year` on raw years;
//! the polynomial model centers years before building its design matrix.

mod linear;
mod polynomial;
mod weighted;

pub use linear::{LinearRecent, RecentLinearFit};
pub use polynomial::{PolynomialFit, PolynomialRegression};
pub use weighted::WeightedLinear;

use crate::utils::stats::{ratio_r_squared, safe_ratio};
use serde::{Deserialize, Serialize};

/// A fitted straight line with its goodness of fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LineFit {
    /// Value of the line at `year`.
    pub fn at(&self, year: i32) -> f64 {
        self.intercept + self.slope * f64::from(year)
    }

    /// Weighted least-squares line; with unit weights this is plain OLS.
    ///
    /// A degenerate abscissa spread gives a flat line through the weighted
    /// mean, and a degenerate total sum of squares gives `r_squared = 0`.
    pub(crate) fn weighted(xs: &[f64], ys: &[f64], weights: &[f64]) -> Self {
        let total_weight: f64 = weights.iter().sum();
        let mean_x = safe_ratio(xs.iter().zip(weights).map(|(x, w)| x * w).sum(), total_weight);
        let mean_y = safe_ratio(ys.iter().zip(weights).map(|(y, w)| y * w).sum(), total_weight);

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for ((x, y), w) in xs.iter().zip(ys).zip(weights) {
            let dx = x - mean_x;
            numerator += w * dx * (y - mean_y);
            denominator += w * dx * dx;
        }

        let slope = safe_ratio(numerator, denominator);
        let intercept = mean_y - slope * mean_x;

        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for ((x, y), w) in xs.iter().zip(ys).zip(weights) {
            let residual = y - (intercept + slope * x);
            ss_res += w * residual * residual;
            ss_tot += w * (y - mean_y).powi(2);
        }

        Self {
            slope,
            intercept,
            r_squared: ratio_r_squared(ss_res, ss_tot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unit_weights_match_ols() {
        let xs = [2018.0, 2019.0, 2020.0, 2021.0, 2022.0];
        let ys = [80.0, 82.0, 83.0, 85.0, 87.0];
        let line = LineFit::weighted(&xs, &ys, &[1.0; 5]);

        assert_relative_eq!(line.slope, 1.7, epsilon = 1e-9);
        assert_relative_eq!(line.at(2020), 83.4, epsilon = 1e-9);
        assert!(line.r_squared > 0.95);
    }

    #[test]
    fn flat_values_have_zero_r_squared() {
        let xs = [2020.0, 2021.0, 2022.0];
        let line = LineFit::weighted(&xs, &[85.0; 3], &[1.0; 3]);
        assert_relative_eq!(line.slope, 0.0, epsilon = 1e-12);
        assert_relative_eq!(line.at(2030), 85.0, epsilon = 1e-9);
        assert_eq!(line.r_squared, 0.0);
    }
}
