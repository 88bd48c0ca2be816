//! Recency-weighted linear regression.

use super::LineFit;
use crate::core::AnnualSeries;
use crate::error::Result;
use crate::models::traits::{ensure_observations, Estimator};
use crate::models::{EstimatorKind, ModelParams};

/// Linear regression over the whole series with exponentially decaying
/// weights toward the past.
///
/// Observation `i` of `n` gets weight `exp((i - (n - 1)) × decay)`, boosted
/// by `recent_boost` for the last `recent_window` observations.
#[derive(Debug, Clone)]
pub struct WeightedLinear {
    decay: f64,
    recent_window: usize,
    recent_boost: f64,
}

impl WeightedLinear {
    pub fn new(decay: f64, recent_window: usize, recent_boost: f64) -> Self {
        Self {
            decay: decay.max(0.0),
            recent_window,
            recent_boost: recent_boost.max(0.0),
        }
    }

    /// Weight of each of `n` observations, oldest first.
    pub fn weights(&self, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let boost = if i + self.recent_window >= n {
                    self.recent_boost
                } else {
                    1.0
                };
                ((i as f64 - (n as f64 - 1.0)) * self.decay).exp() * boost
            })
            .collect()
    }
}

impl Default for WeightedLinear {
    fn default() -> Self {
        Self::new(0.5, 5, 1.5)
    }
}

impl Estimator for WeightedLinear {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::WeightedLinear
    }

    fn min_observations(&self) -> usize {
        3
    }

    fn fit(&self, series: &AnnualSeries) -> Result<ModelParams> {
        ensure_observations(series, self.min_observations())?;
        let years: Vec<f64> = series.years().into_iter().map(f64::from).collect();
        let values = series.values();
        let weights = self.weights(series.len());
        Ok(ModelParams::WeightedLinear(LineFit::weighted(
            &years, &values, &weights,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_favor_recent_observations() {
        let weights = WeightedLinear::default().weights(8);
        assert_eq!(weights.len(), 8);
        assert_relative_eq!(weights[7], 1.5, epsilon = 1e-12);
        assert_relative_eq!(weights[2], 1.0 * (-2.5_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(weights[3], 1.5 * (-2.0_f64).exp(), epsilon = 1e-12);
        assert!(weights.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_weighted_linear_follows_recent_slope() {
        // Flat history, then a steady climb.
        let series = AnnualSeries::from_pairs(&[
            (2012, 80.0),
            (2013, 80.0),
            (2014, 80.0),
            (2015, 80.0),
            (2016, 80.0),
            (2017, 80.0),
            (2018, 81.0),
            (2019, 82.0),
            (2020, 83.0),
            (2021, 84.0),
            (2022, 85.0),
        ])
        .unwrap();
        let params = WeightedLinear::default().fit(&series).unwrap();
        let slope = params.slope().unwrap();
        assert!(slope > 0.8 && slope <= 1.0, "slope {slope}");
        assert!(params.r_squared().unwrap() > 0.9);
    }

    #[test]
    fn test_weighted_linear_confidence_is_r_squared() {
        let series = AnnualSeries::from_pairs(&[
            (2018, 80.0),
            (2019, 82.0),
            (2020, 83.0),
            (2021, 85.0),
            (2022, 87.0),
        ])
        .unwrap();
        let result = WeightedLinear::default().estimate(&series, 2, 2025);
        let r2 = result.r_squared().unwrap();
        assert_relative_eq!(result.forecast[0].confidence.unwrap(), r2, epsilon = 1e-12);
    }
}
