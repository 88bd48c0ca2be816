//! Polynomial regression on centered years.

use crate::core::AnnualSeries;
use crate::error::Result;
use crate::models::traits::{ensure_observations, Estimator};
use crate::models::{EstimatorKind, ModelParams};
use crate::utils::linalg::least_squares;
use crate::utils::stats::{mean, r_squared};
use serde::{Deserialize, Serialize};

/// Fitted polynomial in `year - mean_year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolynomialFit {
    /// Coefficients from the constant term upward.
    pub coefficients: Vec<f64>,
    pub mean_year: f64,
    pub r_squared: f64,
}

impl PolynomialFit {
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Value of the polynomial at `year`.
    pub fn at(&self, year: i32) -> f64 {
        let centered = f64::from(year) - self.mean_year;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * centered + c)
    }
}

/// Least-squares polynomial of a fixed degree.
#[derive(Debug, Clone)]
pub struct PolynomialRegression {
    degree: usize,
}

impl PolynomialRegression {
    /// Create a polynomial estimator; degree is at least 1.
    pub fn new(degree: usize) -> Self {
        Self {
            degree: degree.max(1),
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }
}

impl Default for PolynomialRegression {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Estimator for PolynomialRegression {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Polynomial
    }

    fn min_observations(&self) -> usize {
        self.degree + 2
    }

    fn fit(&self, series: &AnnualSeries) -> Result<ModelParams> {
        ensure_observations(series, self.min_observations())?;
        let years: Vec<f64> = series.years().into_iter().map(f64::from).collect();
        let values = series.values();
        let mean_year = mean(&years);

        let design: Vec<Vec<f64>> = years
            .iter()
            .map(|y| {
                let c = y - mean_year;
                (0..=self.degree).map(|d| c.powi(d as i32)).collect()
            })
            .collect();

        let coefficients = least_squares(&design, &values)?;
        let mut fit = PolynomialFit {
            coefficients,
            mean_year,
            r_squared: 0.0,
        };
        let fitted: Vec<f64> = series.years().into_iter().map(|y| fit.at(y)).collect();
        fit.r_squared = r_squared(&values, &fitted);

        Ok(ModelParams::Polynomial(fit))
    }
}
