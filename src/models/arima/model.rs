//! ARIMA(1,1,1) estimator.

use super::diff::{difference, lag1_ratio};
use crate::core::AnnualSeries;
use crate::error::Result;
use crate::models::traits::{ensure_observations, Estimator};
use crate::models::{EstimatorKind, ModelParams};
use serde::{Deserialize, Serialize};

/// Bound applied to both coefficients to keep the recursion stable.
const COEFFICIENT_BOUND: f64 = 0.9;

/// Fitted ARIMA(1,1,1) coefficients and the state at the last observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArimaState {
    /// AR(1) coefficient on the differenced series.
    pub phi: f64,
    /// MA(1) coefficient on the one-step residuals.
    pub theta: f64,
    pub last_value: f64,
    pub last_diff: f64,
    pub last_residual: f64,
}

impl ArimaState {
    /// Confidence attached to every ARIMA forecast.
    pub const CONFIDENCE: f64 = 0.72;
    /// Nominal R² reported for the model; it is not computed from the fit.
    pub const REPORTED_R_SQUARED: f64 = 0.7;

    /// Value `steps` years after the last observation.
    ///
    /// Runs `diff_t = φ·diff_{t-1} + θ·resid_{t-1}` and integrates onto the
    /// last observed value. The first step uses the last in-sample residual;
    /// after that the residual carries forward as `diff_t·(1 − φ)`.
    pub fn project(&self, steps: usize) -> f64 {
        let mut value = self.last_value;
        let mut diff = self.last_diff;
        let mut residual = self.last_residual;
        for _ in 0..steps {
            diff = self.phi * diff + self.theta * residual;
            value += diff;
            residual = diff - self.phi * diff;
        }
        value
    }
}

/// ARIMA(1,1,1) with closed-form coefficient estimates.
///
/// Fitting differences the series once, takes φ as the lag-1 ratio of the
/// differences, computes one-step residuals (the first residual is the first
/// difference) and takes θ as the lag-1 ratio of those residuals.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arima111;

impl Estimator for Arima111 {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Arima111
    }

    fn min_observations(&self) -> usize {
        4
    }

    fn fit(&self, series: &AnnualSeries) -> Result<ModelParams> {
        ensure_observations(series, self.min_observations())?;
        let values = series.values();
        let diffs = difference(&values);

        let phi = lag1_ratio(&diffs, COEFFICIENT_BOUND);

        let mut residuals = Vec::with_capacity(diffs.len());
        residuals.push(diffs[0]);
        residuals.extend(diffs.windows(2).map(|w| w[1] - phi * w[0]));

        let theta = lag1_ratio(&residuals, COEFFICIENT_BOUND);

        Ok(ModelParams::Arima111(ArimaState {
            phi,
            theta,
            last_value: values[values.len() - 1],
            last_diff: diffs[diffs.len() - 1],
            last_residual: residuals[residuals.len() - 1],
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario() -> AnnualSeries {
        AnnualSeries::from_pairs(&[
            (2018, 80.0),
            (2019, 82.0),
            (2020, 83.0),
            (2021, 85.0),
            (2022, 87.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_arima_coefficients() {
        let ModelParams::Arima111(state) = Arima111.fit(&scenario()).unwrap() else {
            panic!("expected ARIMA params");
        };
        // diffs [2, 1, 2, 2]: phi = (2 + 2 + 4) / (4 + 1 + 4) = 8/9, inside the bound
        assert_relative_eq!(state.phi, 8.0 / 9.0, epsilon = 1e-12);
        assert_relative_eq!(state.last_diff, 2.0, epsilon = 1e-12);
        assert_relative_eq!(state.last_value, 87.0, epsilon = 1e-12);
        assert!(state.theta.abs() <= 0.9);
        assert_relative_eq!(state.last_residual, 2.0 - 8.0 / 9.0 * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_arima_projection_recursion() {
        let state = ArimaState {
            phi: 0.5,
            theta: 0.2,
            last_value: 80.0,
            last_diff: 2.0,
            last_residual: 1.0,
        };
        assert_relative_eq!(state.project(0), 80.0, epsilon = 1e-12);
        // diff1 = 1.0 + 0.2 = 1.2, resid 0.6
        assert_relative_eq!(state.project(1), 81.2, epsilon = 1e-12);
        // diff2 = 0.6 + 0.12 = 0.72, resid 0.36
        assert_relative_eq!(state.project(2), 81.92, epsilon = 1e-12);
        // diff3 = 0.36 + 0.072 = 0.432, resid 0.216
        assert_relative_eq!(state.project(3), 82.352, epsilon = 1e-12);
        // diff4 = 0.216 + 0.0432 = 0.2592
        assert_relative_eq!(state.project(4), 82.6112, epsilon = 1e-12);
    }

    #[test]
    fn test_arima_residual_carries_through_projection() {
        let series = AnnualSeries::from_pairs(&[
            (2016, 79.0),
            (2017, 80.5),
            (2018, 80.0),
            (2019, 82.0),
            (2020, 83.0),
            (2021, 85.0),
            (2022, 87.0),
        ])
        .unwrap();
        let ModelParams::Arima111(state) = Arima111.fit(&series).unwrap() else {
            panic!("expected ARIMA params");
        };
        let expected = [87.767, 88.060, 88.173, 88.216];
        for (steps, &value) in (1..=4).zip(&expected) {
            assert_relative_eq!(state.project(steps), value, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_arima_reports_fixed_quality() {
        let result = Arima111.estimate(&scenario(), 3, 2025);
        assert!(result.is_fitted());
        assert_eq!(result.r_squared(), Some(ArimaState::REPORTED_R_SQUARED));
        assert!(result
            .forecast
            .iter()
            .all(|p| p.confidence == Some(ArimaState::CONFIDENCE)));
    }

    #[test]
    fn test_arima_needs_four_observations() {
        let series =
            AnnualSeries::from_pairs(&[(2020, 80.0), (2021, 82.0), (2022, 83.0)]).unwrap();
        assert!(!Arima111.estimate(&series, 3, 2025).is_fitted());
    }
}
