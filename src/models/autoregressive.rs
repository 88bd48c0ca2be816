//! Autoregressive AR(k) estimator with intercept.

use crate::core::AnnualSeries;
use crate::error::Result;
use crate::models::traits::{ensure_observations, Estimator};
use crate::models::{EstimatorKind, ModelParams};
use crate::utils::linalg::least_squares;
use serde::{Deserialize, Serialize};

/// Fixed-size window of the most recent values, oldest first.
///
/// Pushing consumes the window and returns the shifted one, so iterative
/// forecasting never mutates shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagWindow {
    values: Vec<f64>,
}

impl LagWindow {
    /// Window over the last `order` values of `history`.
    pub fn from_history(history: &[f64], order: usize) -> Self {
        let start = history.len().saturating_sub(order);
        Self {
            values: history[start..].to_vec(),
        }
    }

    pub fn order(&self) -> usize {
        self.values.len()
    }

    /// Most recent value.
    pub fn newest(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// `y_{t-lag}` for `lag` in `1..=order`.
    pub fn lag(&self, lag: usize) -> Option<f64> {
        self.values
            .len()
            .checked_sub(lag)
            .and_then(|i| self.values.get(i).copied())
    }

    /// Drop the oldest value and append `value` as the newest.
    #[must_use]
    pub fn push(mut self, value: f64) -> Self {
        if !self.values.is_empty() {
            self.values.remove(0);
            self.values.push(value);
        }
        self
    }
}

/// Fitted AR(k) coefficients and the lag window at the last observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArFit {
    /// Intercept followed by the coefficients for lags `1..=k`.
    pub coefficients: Vec<f64>,
    pub window: LagWindow,
}

impl ArFit {
    /// Confidence attached to every AR forecast.
    pub const CONFIDENCE: f64 = 0.75;

    /// One-step prediction from a lag window.
    pub fn predict(&self, window: &LagWindow) -> f64 {
        let intercept = self.coefficients.first().copied().unwrap_or(0.0);
        self.coefficients
            .iter()
            .skip(1)
            .enumerate()
            .map(|(j, c)| c * window.lag(j + 1).unwrap_or(0.0))
            .fold(intercept, |acc, term| acc + term)
    }

    /// Value `steps` years after the last observation, feeding each
    /// prediction back as the newest lag.
    pub fn project(&self, steps: usize) -> f64 {
        let mut window = self.window.clone();
        let mut value = window.newest().unwrap_or(0.0);
        for _ in 0..steps {
            value = self.predict(&window);
            window = window.push(value);
        }
        value
    }
}

/// AR(k) fitted by least squares on the lagged design
/// `[1, y_{t-1}, …, y_{t-k}] → y_t`.
#[derive(Debug, Clone)]
pub struct Autoregressive {
    order: usize,
}

impl Autoregressive {
    /// Create an AR model; order is at least 1.
    pub fn new(order: usize) -> Self {
        Self {
            order: order.max(1),
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }
}

impl Default for Autoregressive {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Estimator for Autoregressive {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Autoregressive
    }

    fn min_observations(&self) -> usize {
        self.order + 2
    }

    fn fit(&self, series: &AnnualSeries) -> Result<ModelParams> {
        ensure_observations(series, self.min_observations())?;
        let values = series.values();
        let k = self.order;

        let design: Vec<Vec<f64>> = (k..values.len())
            .map(|t| {
                std::iter::once(1.0)
                    .chain((1..=k).map(|lag| values[t - lag]))
                    .collect()
            })
            .collect();
        let target = &values[k..];

        let coefficients = least_squares(&design, target)?;
        Ok(ModelParams::Autoregressive(ArFit {
            coefficients,
            window: LagWindow::from_history(&values, k),
        }))
    }
}
