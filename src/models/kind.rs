//! Estimator identities and their fitted parameters.
//!
//! Every estimator has an [`EstimatorKind`] and, once fitted, a matching
//! [`ModelParams`] variant. Code that needs per-model behavior matches on
//! these exhaustively instead of inspecting result shapes.

use crate::core::ForecastPoint;
use crate::models::arima::ArimaState;
use crate::models::autoregressive::ArFit;
use crate::models::baseline::MovingAverageFit;
use crate::models::exponential::HoltState;
use crate::models::growth::GrowthFit;
use crate::models::regression::{LineFit, PolynomialFit, RecentLinearFit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a point estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EstimatorKind {
    #[serde(rename = "linear5Year")]
    Linear5Year,
    #[serde(rename = "holts")]
    HoltLinear,
    #[serde(rename = "arima")]
    Arima111,
    #[serde(rename = "cagr")]
    Cagr,
    #[serde(rename = "polynomial")]
    Polynomial,
    #[serde(rename = "weightedLinear")]
    WeightedLinear,
    #[serde(rename = "autoregressive")]
    Autoregressive,
    #[serde(rename = "movingAverage")]
    MovingAverage,
}

impl EstimatorKind {
    /// The seven estimators blended by the standard ensemble.
    pub const ENSEMBLE_MEMBERS: [EstimatorKind; 7] = [
        EstimatorKind::Linear5Year,
        EstimatorKind::HoltLinear,
        EstimatorKind::Arima111,
        EstimatorKind::Cagr,
        EstimatorKind::Polynomial,
        EstimatorKind::WeightedLinear,
        EstimatorKind::Autoregressive,
    ];

    /// Stable machine name, identical to the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            EstimatorKind::Linear5Year => "linear5Year",
            EstimatorKind::HoltLinear => "holts",
            EstimatorKind::Arima111 => "arima",
            EstimatorKind::Cagr => "cagr",
            EstimatorKind::Polynomial => "polynomial",
            EstimatorKind::WeightedLinear => "weightedLinear",
            EstimatorKind::Autoregressive => "autoregressive",
            EstimatorKind::MovingAverage => "movingAverage",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            EstimatorKind::Linear5Year => "5-year linear regression",
            EstimatorKind::HoltLinear => "Holt's linear exponential smoothing",
            EstimatorKind::Arima111 => "ARIMA(1,1,1)",
            EstimatorKind::Cagr => "compound annual growth",
            EstimatorKind::Polynomial => "quadratic regression",
            EstimatorKind::WeightedLinear => "weighted linear regression",
            EstimatorKind::Autoregressive => "autoregressive model",
            EstimatorKind::MovingAverage => "moving average with trend",
        }
    }
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Quality signal reported by a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum QualitySignal {
    /// Coefficient of determination of the fit.
    RSquared(f64),
    /// Fixed confidence assigned to the model.
    Confidence(f64),
    /// The model reports neither.
    Unavailable,
}

/// Fitted state of an estimator, one variant per [`EstimatorKind`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "model")]
pub enum ModelParams {
    Linear5Year(RecentLinearFit),
    HoltLinear(HoltState),
    Arima111(ArimaState),
    Cagr(GrowthFit),
    Polynomial(PolynomialFit),
    WeightedLinear(LineFit),
    Autoregressive(ArFit),
    MovingAverage(MovingAverageFit),
}

impl ModelParams {
    pub fn kind(&self) -> EstimatorKind {
        match self {
            ModelParams::Linear5Year(_) => EstimatorKind::Linear5Year,
            ModelParams::HoltLinear(_) => EstimatorKind::HoltLinear,
            ModelParams::Arima111(_) => EstimatorKind::Arima111,
            ModelParams::Cagr(_) => EstimatorKind::Cagr,
            ModelParams::Polynomial(_) => EstimatorKind::Polynomial,
            ModelParams::WeightedLinear(_) => EstimatorKind::WeightedLinear,
            ModelParams::Autoregressive(_) => EstimatorKind::Autoregressive,
            ModelParams::MovingAverage(_) => EstimatorKind::MovingAverage,
        }
    }

    /// Unclamped value the fitted model gives for `year`, where `last_year`
    /// is the final observed year of the training series.
    ///
    /// Also used by the ensemble to bridge gap years that the estimator's own
    /// forecast does not cover.
    pub fn project(&self, year: i32, last_year: i32) -> f64 {
        match self {
            ModelParams::Linear5Year(fit) => fit.line.at(year),
            ModelParams::HoltLinear(state) => state.project(year - last_year),
            ModelParams::Arima111(state) => state.project(steps_ahead(year, last_year)),
            ModelParams::Cagr(fit) => fit.project(year - last_year),
            ModelParams::Polynomial(fit) => fit.at(year),
            ModelParams::WeightedLinear(line) => line.at(year),
            ModelParams::Autoregressive(fit) => fit.project(steps_ahead(year, last_year)),
            ModelParams::MovingAverage(fit) => fit.project(year - last_year),
        }
    }

    /// R² reported by the model, if it reports one.
    pub fn r_squared(&self) -> Option<f64> {
        match self {
            ModelParams::Linear5Year(fit) => Some(fit.line.r_squared),
            ModelParams::HoltLinear(state) => Some(state.r_squared),
            ModelParams::Arima111(_) => Some(ArimaState::REPORTED_R_SQUARED),
            ModelParams::Polynomial(fit) => Some(fit.r_squared),
            ModelParams::WeightedLinear(line) => Some(line.r_squared),
            ModelParams::Cagr(_) | ModelParams::Autoregressive(_) | ModelParams::MovingAverage(_) => {
                None
            }
        }
    }

    /// Fixed confidence the model attaches to its forecasts, if any.
    pub fn confidence(&self) -> Option<f64> {
        match self {
            ModelParams::HoltLinear(_) => Some(HoltState::CONFIDENCE),
            ModelParams::Arima111(_) => Some(ArimaState::CONFIDENCE),
            ModelParams::Autoregressive(_) => Some(ArFit::CONFIDENCE),
            ModelParams::MovingAverage(_) => Some(MovingAverageFit::CONFIDENCE),
            ModelParams::Linear5Year(fit) => Some(fit.line.r_squared.clamp(0.0, 1.0)),
            ModelParams::Polynomial(fit) => Some(fit.r_squared.clamp(0.0, 1.0)),
            ModelParams::WeightedLinear(line) => Some(line.r_squared.clamp(0.0, 1.0)),
            ModelParams::Cagr(_) => None,
        }
    }

    /// Slope of the fitted line for line-based models.
    pub fn slope(&self) -> Option<f64> {
        match self {
            ModelParams::Linear5Year(fit) => Some(fit.line.slope),
            ModelParams::WeightedLinear(line) => Some(line.slope),
            ModelParams::HoltLinear(_)
            | ModelParams::Arima111(_)
            | ModelParams::Cagr(_)
            | ModelParams::Polynomial(_)
            | ModelParams::Autoregressive(_)
            | ModelParams::MovingAverage(_) => None,
        }
    }

    /// R² when reported, otherwise the model's confidence.
    pub fn quality(&self) -> QualitySignal {
        match (self.r_squared(), self.confidence()) {
            (Some(r2), _) => QualitySignal::RSquared(r2),
            (None, Some(c)) => QualitySignal::Confidence(c),
            (None, None) => QualitySignal::Unavailable,
        }
    }
}

/// Number of whole steps from `last_year` to `year`; zero when not ahead.
fn steps_ahead(year: i32, last_year: i32) -> usize {
    usize::try_from(year - last_year).unwrap_or(0)
}

/// Output of one estimator over one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatorResult {
    pub kind: EstimatorKind,
    pub forecast: Vec<ForecastPoint>,
    /// `None` when the estimator failed soft.
    pub params: Option<ModelParams>,
}

impl EstimatorResult {
    /// Result of an estimator that could not fit.
    pub fn empty(kind: EstimatorKind) -> Self {
        Self {
            kind,
            forecast: Vec::new(),
            params: None,
        }
    }

    pub fn fitted(forecast: Vec<ForecastPoint>, params: ModelParams) -> Self {
        Self {
            kind: params.kind(),
            forecast,
            params: Some(params),
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }

    /// Forecast point at `index` of the requested horizon.
    pub fn point(&self, index: usize) -> Option<&ForecastPoint> {
        self.forecast.get(index)
    }

    pub fn r_squared(&self) -> Option<f64> {
        self.params.as_ref().and_then(ModelParams::r_squared)
    }

    pub fn quality(&self) -> QualitySignal {
        self.params
            .as_ref()
            .map_or(QualitySignal::Unavailable, ModelParams::quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_serialized_form() {
        for kind in EstimatorKind::ENSEMBLE_MEMBERS
            .iter()
            .chain(std::iter::once(&EstimatorKind::MovingAverage))
        {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn ensemble_members_exclude_moving_average() {
        assert_eq!(EstimatorKind::ENSEMBLE_MEMBERS.len(), 7);
        assert!(!EstimatorKind::ENSEMBLE_MEMBERS.contains(&EstimatorKind::MovingAverage));
    }

    #[test]
    fn empty_result_has_no_quality() {
        let result = EstimatorResult::empty(EstimatorKind::Cagr);
        assert!(!result.is_fitted());
        assert!(result.point(0).is_none());
        assert_eq!(result.quality(), QualitySignal::Unavailable);
        assert_eq!(result.r_squared(), None);
    }

    #[test]
    fn steps_ahead_saturates_at_zero() {
        assert_eq!(steps_ahead(2026, 2022), 4);
        assert_eq!(steps_ahead(2020, 2022), 0);
    }
}
