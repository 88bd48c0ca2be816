//! Direction and strength of the historical trend.

use crate::core::AnnualSeries;
use crate::models::regression::LinearRecent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Percent changes smaller than this (in absolute value) count as stable.
const STABLE_PERCENT: f64 = 1.0;
const STRONG: f64 = 0.7;
const MODERATE: f64 = 0.4;

/// Classified direction of a historical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    StrongIncreasing,
    ModerateIncreasing,
    WeakIncreasing,
    Stable,
    WeakDecreasing,
    ModerateDecreasing,
    StrongDecreasing,
    InsufficientData,
}

impl TrendDirection {
    /// Classify from the overall change, percent change and fit strength.
    pub fn classify(change: f64, percent_change: f64, strength: f64) -> Self {
        let level = if strength > STRONG {
            2
        } else if strength > MODERATE {
            1
        } else {
            0
        };

        if percent_change.abs() < STABLE_PERCENT {
            TrendDirection::Stable
        } else if change > 0.0 {
            match level {
                2 => TrendDirection::StrongIncreasing,
                1 => TrendDirection::ModerateIncreasing,
                _ => TrendDirection::WeakIncreasing,
            }
        } else {
            match level {
                2 => TrendDirection::StrongDecreasing,
                1 => TrendDirection::ModerateDecreasing,
                _ => TrendDirection::WeakDecreasing,
            }
        }
    }

    /// Stable machine name, identical to the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            TrendDirection::StrongIncreasing => "strong_increasing",
            TrendDirection::ModerateIncreasing => "moderate_increasing",
            TrendDirection::WeakIncreasing => "weak_increasing",
            TrendDirection::Stable => "stable",
            TrendDirection::WeakDecreasing => "weak_decreasing",
            TrendDirection::ModerateDecreasing => "moderate_decreasing",
            TrendDirection::StrongDecreasing => "strong_decreasing",
            TrendDirection::InsufficientData => "insufficient_data",
        }
    }

    /// Symbol shown next to the summary.
    pub fn symbol(self) -> &'static str {
        match self {
            TrendDirection::StrongIncreasing => "📈",
            TrendDirection::ModerateIncreasing => "↗️",
            TrendDirection::WeakIncreasing => "↗",
            TrendDirection::Stable => "➡️",
            TrendDirection::WeakDecreasing => "↘",
            TrendDirection::ModerateDecreasing => "↘️",
            TrendDirection::StrongDecreasing => "📉",
            TrendDirection::InsufficientData => "❓",
        }
    }

    /// Phrase used in prose summaries.
    pub fn describe(self) -> &'static str {
        match self {
            TrendDirection::StrongIncreasing => "strongly increasing",
            TrendDirection::ModerateIncreasing => "moderately increasing",
            TrendDirection::WeakIncreasing => "slightly increasing",
            TrendDirection::Stable => "stable",
            TrendDirection::WeakDecreasing => "slightly decreasing",
            TrendDirection::ModerateDecreasing => "moderately decreasing",
            TrendDirection::StrongDecreasing => "strongly decreasing",
            TrendDirection::InsufficientData => "uncertain",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Summary of a series' historical trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    /// |R²| of the recent linear fit, in `[0, 1]`.
    pub strength: f64,
    /// `last - first`, in percentage points.
    pub change: f64,
    /// `change / first × 100`; 0 when the first value is 0.
    pub percent_change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_year: Option<i32>,
}

impl TrendAnalysis {
    fn insufficient() -> Self {
        Self {
            direction: TrendDirection::InsufficientData,
            strength: 0.0,
            change: 0.0,
            percent_change: 0.0,
            first_year: None,
            last_year: None,
        }
    }
}

/// Classify the direction and strength of the series' trend.
///
/// Strength comes from the 5-year linear regression; series too short for
/// that regression have strength 0.
pub fn analyze_trend(series: &AnnualSeries) -> TrendAnalysis {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => (*first, *last),
        _ => return TrendAnalysis::insufficient(),
    };

    let change = last.value - first.value;
    let percent_change = if first.value == 0.0 {
        0.0
    } else {
        change / first.value * 100.0
    };
    let strength = LinearRecent::default()
        .fit_line(series)
        .map(|fit| fit.line.r_squared.abs().min(1.0))
        .unwrap_or(0.0);

    TrendAnalysis {
        direction: TrendDirection::classify(change, percent_change, strength),
        strength,
        change,
        percent_change,
        first_year: Some(first.year),
        last_year: Some(last.year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_strong_increasing() {
        let series = AnnualSeries::from_pairs(&[
            (2018, 80.0),
            (2019, 82.0),
            (2020, 83.0),
            (2021, 85.0),
            (2022, 87.0),
        ])
        .unwrap();
        let trend = analyze_trend(&series);
        assert_eq!(trend.direction, TrendDirection::StrongIncreasing);
        assert_relative_eq!(trend.change, 7.0, epsilon = 1e-12);
        assert_relative_eq!(trend.percent_change, 8.75, epsilon = 1e-12);
        assert!(trend.strength > 0.95);
        assert_eq!(trend.first_year, Some(2018));
        assert_eq!(trend.last_year, Some(2022));
    }

    #[test]
    fn test_stable_under_one_percent() {
        let series =
            AnnualSeries::from_pairs(&[(2020, 85.0), (2021, 85.5), (2022, 85.4)]).unwrap();
        assert_eq!(analyze_trend(&series).direction, TrendDirection::Stable);
    }

    #[test]
    fn test_noisy_decline_is_weak() {
        let series = AnnualSeries::from_pairs(&[
            (2018, 90.0),
            (2019, 84.0),
            (2020, 91.0),
            (2021, 83.0),
            (2022, 88.0),
        ])
        .unwrap();
        let trend = analyze_trend(&series);
        assert!(trend.strength <= 0.4);
        assert_eq!(trend.direction, TrendDirection::WeakDecreasing);
    }

    #[test]
    fn test_two_points_have_zero_strength() {
        let series = AnnualSeries::from_pairs(&[(2021, 80.0), (2022, 84.0)]).unwrap();
        let trend = analyze_trend(&series);
        assert_eq!(trend.strength, 0.0);
        assert_eq!(trend.direction, TrendDirection::WeakIncreasing);
    }

    #[test]
    fn test_insufficient_data() {
        let series = AnnualSeries::from_pairs(&[(2022, 84.0)]).unwrap();
        let trend = analyze_trend(&series);
        assert_eq!(trend.direction, TrendDirection::InsufficientData);
        assert_eq!(trend.strength, 0.0);
        assert_eq!(trend.first_year, None);
        assert_eq!(TrendDirection::InsufficientData.describe(), "uncertain");
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(
            TrendDirection::classify(-5.0, -6.0, 0.75),
            TrendDirection::StrongDecreasing
        );
        assert_eq!(
            TrendDirection::classify(-5.0, -6.0, 0.5),
            TrendDirection::ModerateDecreasing
        );
        assert_eq!(
            TrendDirection::classify(5.0, 6.0, 0.4),
            TrendDirection::WeakIncreasing
        );
        assert_eq!(
            TrendDirection::classify(0.5, 0.9, 0.99),
            TrendDirection::Stable
        );
    }

    #[test]
    fn test_direction_serializes_snake_case() {
        let json = serde_json::to_string(&TrendDirection::StrongIncreasing).unwrap();
        assert_eq!(json, "\"strong_increasing\"");
        assert_eq!(TrendDirection::Stable.to_string(), "stable");
    }
}
