//! Forecast points shared by estimators and the ensemble.

use crate::models::EstimatorKind;
use serde::{Deserialize, Serialize};

/// Contribution of one estimator to an ensemble year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodContribution {
    pub kind: EstimatorKind,
    /// Method value after the realistic-ceiling cap.
    pub value: f64,
    /// Final weight after alignment, penalties and preference.
    pub weight: f64,
}

/// A single forecast year.
///
/// Field names serialize in camelCase, which is what chart renderers read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub year: i32,
    pub predicted: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    /// Year between the last observation and the anchor year.
    #[serde(default)]
    pub is_gap_year: bool,
    /// Surviving estimator contributions (ensemble output only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodContribution>,
}

impl ForecastPoint {
    /// Point prediction without confidence or interval.
    pub fn new(year: i32, predicted: f64) -> Self {
        Self {
            year,
            predicted,
            confidence: None,
            lower_bound: None,
            upper_bound: None,
            is_gap_year: false,
            methods: Vec::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_interval(mut self, lower: f64, upper: f64) -> Self {
        self.lower_bound = Some(lower);
        self.upper_bound = Some(upper);
        self
    }

    /// Width of the interval, when one is attached.
    pub fn interval_width(&self) -> Option<f64> {
        Some(self.upper_bound? - self.lower_bound?)
    }

    /// Share of the total weight carried by each contributing method.
    pub fn method_shares(&self) -> Vec<(EstimatorKind, f64)> {
        let total: f64 = self.methods.iter().map(|m| m.weight).sum();
        if total <= 0.0 {
            return Vec::new();
        }
        self.methods
            .iter()
            .map(|m| (m.kind, m.weight / total))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn builder_attaches_confidence_and_interval() {
        let point = ForecastPoint::new(2026, 88.4)
            .with_confidence(0.8)
            .with_interval(86.0, 90.5);
        assert_eq!(point.confidence, Some(0.8));
        assert_relative_eq!(point.interval_width().unwrap(), 4.5, epsilon = 1e-12);
        assert!(!point.is_gap_year);
        assert!(ForecastPoint::new(2026, 1.0).interval_width().is_none());
    }

    #[test]
    fn method_shares_are_normalized() {
        let mut point = ForecastPoint::new(2026, 88.0);
        point.methods = vec![
            MethodContribution {
                kind: EstimatorKind::Linear5Year,
                value: 88.5,
                weight: 0.6,
            },
            MethodContribution {
                kind: EstimatorKind::Cagr,
                value: 89.0,
                weight: 0.2,
            },
        ];
        let shares = point.method_shares();
        assert_eq!(shares.len(), 2);
        assert_relative_eq!(shares[0].1, 0.75, epsilon = 1e-12);
        assert_relative_eq!(shares[1].1, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn method_shares_empty_without_weight() {
        assert!(ForecastPoint::new(2026, 88.0).method_shares().is_empty());
    }
}
