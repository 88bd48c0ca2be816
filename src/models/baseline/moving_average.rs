//! Moving average with a trend taken from the rolling means.

use crate::core::AnnualSeries;
use crate::error::Result;
use crate::models::traits::{ensure_observations, Estimator};
use crate::models::{EstimatorKind, ModelParams};
use crate::utils::stats::mean;
use serde::{Deserialize, Serialize};

/// Fitted moving-average level and per-year trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingAverageFit {
    /// Mean of the last `window` observations.
    pub level: f64,
    /// Average step between the first and last rolling mean.
    pub trend: f64,
    pub window: usize,
}

impl MovingAverageFit {
    /// Confidence attached to every moving-average forecast.
    pub const CONFIDENCE: f64 = 0.7;

    /// `level + h × trend`, `h` years past the last observation.
    pub fn project(&self, h: i32) -> f64 {
        self.level + self.trend * f64::from(h)
    }
}

/// Moving average forecaster with trend.
///
/// Not an ensemble member by default; register it explicitly to blend it.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
}

impl MovingAverage {
    /// Create a moving average over `window` observations (at least 1).
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Estimator for MovingAverage {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::MovingAverage
    }

    fn min_observations(&self) -> usize {
        self.window + 1
    }

    fn fit(&self, series: &AnnualSeries) -> Result<ModelParams> {
        ensure_observations(series, self.min_observations())?;
        let values = series.values();

        let rolling: Vec<f64> = values.windows(self.window).map(mean).collect();
        let level = rolling[rolling.len() - 1];
        let trend = (rolling[rolling.len() - 1] - rolling[0]) / (rolling.len() - 1) as f64;

        Ok(ModelParams::MovingAverage(MovingAverageFit {
            level,
            trend,
            window: self.window,
        }))
    }
}
