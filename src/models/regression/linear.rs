//! Linear regression over the most recent observations.

use super::LineFit;
use crate::core::{clamp_percent, AnnualSeries, ForecastPoint};
use crate::error::Result;
use crate::models::traits::{ensure_observations, Estimator};
use crate::models::{EstimatorKind, ModelParams};
use crate::utils::stats::{mean, quantile_normal, safe_ratio};
use serde::{Deserialize, Serialize};

/// Fitted recent-window line plus the statistics its prediction interval needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentLinearFit {
    pub line: LineFit,
    /// Number of observations in the window.
    pub observations: usize,
    pub mean_year: f64,
    /// Sum of squared year deviations.
    pub sxx: f64,
    /// Residual standard error, `sqrt(SSres / (n - 2))`.
    pub residual_std: f64,
}

impl RecentLinearFit {
    /// Half-width of the prediction interval at `year` for normal quantile `z`.
    pub fn margin(&self, year: i32, z: f64) -> f64 {
        let n = self.observations as f64;
        let dx = f64::from(year) - self.mean_year;
        z * self.residual_std * (1.0 + 1.0 / n + safe_ratio(dx * dx, self.sxx)).sqrt()
    }
}

/// OLS line through the last `window` observations, with prediction intervals.
#[derive(Debug, Clone)]
pub struct LinearRecent {
    window: usize,
    level: f64,
}

impl LinearRecent {
    /// Create an estimator over the last `window` observations with the given
    /// two-sided interval level.
    ///
    /// # Arguments
    /// * `window` - Number of recent observations used (at least 3)
    /// * `level` - Prediction interval level, e.g. 0.95
    pub fn new(window: usize, level: f64) -> Self {
        Self {
            window: window.max(3),
            level: level.clamp(0.5, 0.999),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Fit the line only; exposed for trend analysis.
    pub fn fit_line(&self, series: &AnnualSeries) -> Result<RecentLinearFit> {
        ensure_observations(series, 3)?;
        let recent = series.recent(self.window);
        let years: Vec<f64> = recent.iter().map(|o| f64::from(o.year)).collect();
        let values: Vec<f64> = recent.iter().map(|o| o.value).collect();

        let line = LineFit::weighted(&years, &values, &vec![1.0; years.len()]);
        let mean_year = mean(&years);
        let sxx: f64 = years.iter().map(|y| (y - mean_year).powi(2)).sum();
        let ss_res: f64 = years
            .iter()
            .zip(&values)
            .map(|(x, y)| (y - (line.intercept + line.slope * x)).powi(2))
            .sum();
        let n = years.len();

        Ok(RecentLinearFit {
            line,
            observations: n,
            mean_year,
            sxx,
            residual_std: (ss_res / (n - 2) as f64).sqrt(),
        })
    }
}

impl Default for LinearRecent {
    fn default() -> Self {
        Self::new(5, 0.95)
    }
}

impl Estimator for LinearRecent {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Linear5Year
    }

    fn min_observations(&self) -> usize {
        3
    }

    fn fit(&self, series: &AnnualSeries) -> Result<ModelParams> {
        self.fit_line(series).map(ModelParams::Linear5Year)
    }

    fn forecast_point(&self, params: &ModelParams, year: i32, last_year: i32) -> ForecastPoint {
        let predicted = params.project(year, last_year);
        let mut point = ForecastPoint::new(year, clamp_percent(predicted));
        if let Some(confidence) = params.confidence() {
            point = point.with_confidence(confidence);
        }
        if let ModelParams::Linear5Year(fit) = params {
            let z = quantile_normal((1.0 + self.level) / 2.0);
            let margin = fit.margin(year, z);
            point = point.with_interval(
                clamp_percent(predicted - margin),
                clamp_percent(predicted + margin),
            );
        }
        point
    }
}
