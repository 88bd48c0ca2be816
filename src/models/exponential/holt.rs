//! Holt's Linear Trend forecasting model.
//!
//! Also known as double exponential smoothing, this model is suitable for
//! data with a linear trend but no seasonality.

use crate::core::AnnualSeries;
use crate::error::Result;
use crate::models::traits::{ensure_observations, Estimator};
use crate::models::{EstimatorKind, ModelParams};
use crate::utils::stats::r_squared;
use serde::{Deserialize, Serialize};

/// Final smoothed state of Holt's method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoltState {
    pub level: f64,
    pub trend: f64,
    /// R² of the smoothed levels against the observations.
    pub r_squared: f64,
}

impl HoltState {
    /// Confidence attached to every Holt forecast.
    pub const CONFIDENCE: f64 = 0.75;

    /// `level + h × trend`, `h` years past the last observation.
    pub fn project(&self, h: i32) -> f64 {
        self.level + f64::from(h) * self.trend
    }
}

/// Holt's Linear Trend estimator.
///
/// The model equations are:
/// - Level: `l_t = α × y_t + (1-α) × (l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β × (l_t - l_{t-1}) + (1-β) × b_{t-1}`
/// - Forecast: `ŷ_{t+h} = l_t + h × b_t`
///
/// The state starts at `l_0 = y_0`, `b_0 = y_1 - y_0`.
#[derive(Debug, Clone)]
pub struct HoltLinear {
    /// Level smoothing parameter (0 < alpha < 1).
    alpha: f64,
    /// Trend smoothing parameter (0 < beta < 1).
    beta: f64,
}

impl HoltLinear {
    /// Create a new Holt model with fixed parameters.
    ///
    /// # Arguments
    /// * `alpha` - Level smoothing parameter (0 < alpha < 1)
    /// * `beta` - Trend smoothing parameter (0 < beta < 1)
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0001, 0.9999),
            beta: beta.clamp(0.0001, 0.9999),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Run the smoothing recursion, returning the final state and the level
    /// after every observation.
    fn smooth(&self, values: &[f64]) -> (f64, f64, Vec<f64>) {
        let mut level = values[0];
        let mut trend = values[1] - values[0];
        let mut levels = Vec::with_capacity(values.len());
        levels.push(level);

        for &y in &values[1..] {
            let prev_level = level;
            level = self.alpha * y + (1.0 - self.alpha) * (prev_level + trend);
            trend = self.beta * (level - prev_level) + (1.0 - self.beta) * trend;
            levels.push(level);
        }

        (level, trend, levels)
    }
}

impl Default for HoltLinear {
    fn default() -> Self {
        Self::new(0.3, 0.1)
    }
}

impl Estimator for HoltLinear {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::HoltLinear
    }

    fn min_observations(&self) -> usize {
        3
    }

    fn fit(&self, series: &AnnualSeries) -> Result<ModelParams> {
        ensure_observations(series, self.min_observations())?;
        let values = series.values();
        let (level, trend, levels) = self.smooth(&values);

        Ok(ModelParams::HoltLinear(HoltState {
            level,
            trend,
            r_squared: r_squared(&values, &levels),
        }))
    }
}
