//! Short forecast summary.

use super::FIFTH_YEAR;
use crate::core::ForecastPoint;
use crate::features::TrendAnalysis;
use serde::Serialize;

const NO_FORECAST: &str = "Insufficient historical data for forecasting.";

/// Trend symbol plus a one-paragraph summary of a forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub trend: TrendAnalysis,
    pub symbol: &'static str,
    pub summary: String,
}

impl ForecastReport {
    /// Summarize `forecast` against the historical `trend`.
    ///
    /// Gap-year points are skipped: the summary quotes the first requested
    /// year and the fifth (or last, for shorter horizons).
    pub fn new(forecast: &[ForecastPoint], trend: TrendAnalysis) -> Self {
        Self {
            symbol: trend.direction.symbol(),
            summary: summarize(forecast, &trend),
            trend,
        }
    }
}

fn summarize(forecast: &[ForecastPoint], trend: &TrendAnalysis) -> String {
    let requested: Vec<&ForecastPoint> = forecast.iter().filter(|p| !p.is_gap_year).collect();
    let (next, fifth) = match (requested.first(), requested.get(FIFTH_YEAR).or(requested.last())) {
        (Some(next), Some(fifth)) => (*next, *fifth),
        _ => return NO_FORECAST.to_string(),
    };

    let mut summary = format!("Historical trend is {}", trend.direction.describe());
    if let (Some(first_year), Some(last_year)) = (trend.first_year, trend.last_year) {
        let change = if trend.percent_change > 0.0 {
            format!("increased by {:.2}%", trend.percent_change)
        } else if trend.percent_change < 0.0 {
            format!("decreased by {:.2}%", trend.percent_change.abs())
        } else {
            "unchanged".to_string()
        };
        summary.push_str(&format!(" ({change} from {first_year} to {last_year})"));
    }
    summary.push_str(&format!(
        ". Forecasted {}: {:.1}%. Forecasted {}: {:.1}%.",
        next.year, next.predicted, fifth.year, fifth.predicted
    ));
    summary
}
