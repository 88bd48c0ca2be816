//! Compound annual growth rate (CAGR) estimator.

use crate::core::AnnualSeries;
use crate::error::{ForecastError, Result};
use crate::models::traits::{ensure_observations, Estimator};
use crate::models::{EstimatorKind, ModelParams};
use serde::{Deserialize, Serialize};

/// Fitted compound growth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthFit {
    /// Annual growth as a fraction (0.01 = 1% per year).
    pub rate: f64,
    pub last_value: f64,
}

impl GrowthFit {
    /// Annual growth in percent.
    pub fn rate_percent(&self) -> f64 {
        self.rate * 100.0
    }

    /// `last × (1 + rate)^h`, `h` years past the last observation.
    pub fn project(&self, h: i32) -> f64 {
        self.last_value * (1.0 + self.rate).powi(h)
    }
}

/// Compounds the average growth between the first and last observation.
///
/// `rate = (last / first)^(1 / (last_year - first_year)) - 1`
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundGrowth;

impl Estimator for CompoundGrowth {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Cagr
    }

    fn min_observations(&self) -> usize {
        2
    }

    fn fit(&self, series: &AnnualSeries) -> Result<ModelParams> {
        ensure_observations(series, self.min_observations())?;
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ForecastError::EmptyData),
        };

        let periods = last.year - first.year;
        if periods == 0 || first.value <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "growth undefined from {} over {periods} years",
                first.value
            )));
        }

        let rate = (last.value / first.value).powf(1.0 / f64::from(periods)) - 1.0;
        Ok(ModelParams::Cagr(GrowthFit {
            rate,
            last_value: last.value,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cagr_rate() {
        let series = AnnualSeries::from_pairs(&[(2020, 80.0), (2022, 88.2)]).unwrap();
        let ModelParams::Cagr(fit) = CompoundGrowth.fit(&series).unwrap() else {
            panic!("expected growth params");
        };
        assert_relative_eq!(fit.rate, (88.2_f64 / 80.0).sqrt() - 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.project(1), 88.2 * (1.0 + fit.rate), epsilon = 1e-9);
    }

    #[test]
    fn test_cagr_flat_series_is_flat() {
        let series = AnnualSeries::from_pairs(&[(2021, 85.0), (2022, 85.0)]).unwrap();
        let result = CompoundGrowth.estimate(&series, 5, 2025);
        let Some(ModelParams::Cagr(fit)) = result.params else {
            panic!("expected growth params");
        };
        assert_eq!(fit.rate, 0.0);
        assert_eq!(fit.rate_percent(), 0.0);
        assert!(result.forecast.iter().all(|p| p.predicted == 85.0));
        assert!(result.forecast.iter().all(|p| p.confidence.is_none()));
    }

    #[test]
    fn test_cagr_zero_start_fails_soft() {
        let series = AnnualSeries::from_pairs(&[(2020, 0.0), (2021, 3.0), (2022, 5.0)]).unwrap();
        assert!(matches!(
            CompoundGrowth.fit(&series),
            Err(ForecastError::InvalidParameter(_))
        ));
        let result = CompoundGrowth.estimate(&series, 5, 2025);
        assert!(!result.is_fitted());
        assert!(result.forecast.is_empty());
    }

    #[test]
    fn test_cagr_single_observation_is_empty() {
        let series = AnnualSeries::from_pairs(&[(2022, 85.0)]).unwrap();
        assert!(!CompoundGrowth.estimate(&series, 5, 2025).is_fitted());
    }
}
