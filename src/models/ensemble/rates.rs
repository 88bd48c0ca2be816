//! Trend rates derived from the observed series.

use super::config::EnsembleConfig;
use crate::core::{year_over_year, AnnualSeries};
use crate::utils::stats::{mean, population_std_dev, safe_ratio};
use serde::Serialize;

/// |average recent change| below this counts as no direction when computing
/// the coefficient of variation.
const FLAT_CHANGE: f64 = 0.1;
/// Coefficient of variation assumed for flat recent changes.
const FLAT_VARIATION: f64 = 0.3;
/// Recent and long-term rates closer than this count as aligned.
const ALIGNED_RATES: f64 = 0.5;
const MISALIGNED_SCORE: f64 = 0.8;

/// Rates that drive the sequential blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRates {
    /// Mean year-over-year change within the recent window.
    pub avg_recent_change: f64,
    /// `(last - first) / (len - 1)` over the recent window.
    pub recent_trend_rate: f64,
    /// `(last - first) / (last_year - first_year)` over the whole series.
    pub long_term_trend_rate: f64,
    /// Population standard deviation of all year-over-year changes.
    pub volatility: f64,
    /// Blend of the recent and long-term rates.
    pub base_rate: f64,
    /// The less extreme of `avg_recent_change` and `base_rate`.
    pub conservative_rate: f64,
    /// Confidence attached to every ensemble point.
    pub confidence: f64,
}

impl TrendRates {
    pub fn from_series(series: &AnnualSeries, config: &EnsembleConfig) -> Self {
        let recent = series.recent(config.recent_window);
        let recent_changes = year_over_year(recent);
        let avg_recent_change = mean(&recent_changes);

        let recent_trend_rate = match (recent.first(), recent.last()) {
            (Some(first), Some(last)) if recent.len() >= 2 => {
                (last.value - first.value) / (recent.len() - 1) as f64
            }
            _ => 0.0,
        };

        let long_term_trend_rate = match (series.first(), series.last()) {
            (Some(first), Some(last)) => {
                safe_ratio(last.value - first.value, f64::from(series.span_years()))
            }
            _ => 0.0,
        };

        let volatility = population_std_dev(&series.changes());

        let base_rate = recent_trend_rate * config.recent_rate_share
            + long_term_trend_rate * (1.0 - config.recent_rate_share);
        let conservative_rate = if avg_recent_change.abs() < base_rate.abs() {
            avg_recent_change
        } else {
            base_rate
        };

        let confidence = if recent_changes.len() >= 2 {
            let spread = population_std_dev(&recent_changes);
            let variation = if avg_recent_change.abs() > FLAT_CHANGE {
                spread / avg_recent_change.abs()
            } else {
                FLAT_VARIATION
            };
            let stability = (1.0 - variation.min(0.5)).max(0.5);
            let alignment = if (recent_trend_rate - long_term_trend_rate).abs() < ALIGNED_RATES {
                1.0
            } else {
                MISALIGNED_SCORE
            };
            ((stability + alignment) / 2.0)
                .max(config.min_confidence)
                .min(config.max_confidence)
        } else {
            config.default_confidence
        };

        Self {
            avg_recent_change,
            recent_trend_rate,
            long_term_trend_rate,
            volatility,
            base_rate,
            conservative_rate,
            confidence,
        }
    }
}
