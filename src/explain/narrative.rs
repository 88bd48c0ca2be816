//! Plain-text explanation of an ensemble forecast.

use super::FIFTH_YEAR;
use crate::core::{AnnualSeries, ForecastPoint, Observation};
use crate::models::ensemble::EnsembleResult;
use crate::models::{EstimatorKind, ModelParams};
use serde::Serialize;
use std::fmt;

/// Observations in the "recent trend" paragraph.
const RECENT_YEARS: usize = 5;
/// Percentage-point change that counts as movement over the whole history.
const HISTORY_THRESHOLD: f64 = 1.0;
/// Percentage-point change that counts as movement over recent or projected years.
const RECENT_THRESHOLD: f64 = 0.5;

/// Direction of a change in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    Rising,
    Declining,
    Stable,
}

impl Movement {
    /// `Stable` unless `change` exceeds `threshold` in either direction.
    pub fn classify(change: f64, threshold: f64) -> Self {
        if change > threshold {
            Movement::Rising
        } else if change < -threshold {
            Movement::Declining
        } else {
            Movement::Stable
        }
    }
}

/// Paragraphs of an [`Explanation`], in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    HistoricalContext,
    RecentTrend,
    Projection,
    Methods,
    DataNote,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub text: String,
}

/// Ordered plain-text account of a forecast for one location.
///
/// Rendering (markup, colors) is left to the presentation layer; `Display`
/// joins the sections into paragraphs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub location: String,
    pub sections: Vec<Section>,
}

impl Explanation {
    pub fn build(result: &EnsembleResult, series: &AnnualSeries, location: &str) -> Self {
        let mut sections = Vec::new();

        if let (Some(first), Some(last)) = (series.first(), series.last()) {
            sections.push(Section {
                kind: SectionKind::HistoricalContext,
                text: historical_context(location, first, last),
            });
            sections.push(Section {
                kind: SectionKind::RecentTrend,
                text: recent_trend(series.recent(RECENT_YEARS)),
            });

            let requested: Vec<&ForecastPoint> = result.horizon_points().collect();
            if let (Some(next), Some(fifth)) =
                (requested.first(), requested.get(FIFTH_YEAR).or(requested.last()))
            {
                sections.push(Section {
                    kind: SectionKind::Projection,
                    text: projection(last, next, fifth),
                });
            }

            if let Some((kind, share)) = result.most_influential() {
                sections.push(Section {
                    kind: SectionKind::Methods,
                    text: influential_method(result, kind, share),
                });
            }

            sections.push(Section {
                kind: SectionKind::DataNote,
                text: format!(
                    "Note: this forecast is based on {} years of historical data ({}-{}). \
                     Actual values may differ after policy or economic changes that the history \
                     does not capture.",
                    series.len(),
                    first.year,
                    last.year
                ),
            });
        } else {
            sections.push(Section {
                kind: SectionKind::DataNote,
                text: "Insufficient historical data for detailed analysis.".to_string(),
            });
        }

        Self {
            location: location.to_string(),
            sections,
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Why this forecast?")?;
        for section in &self.sections {
            write!(f, "\n{}\n", section.text)?;
        }
        Ok(())
    }
}

fn historical_context(location: &str, first: &Observation, last: &Observation) -> String {
    let change = last.value - first.value;
    let years = last.year - first.year;
    let mut text = format!(
        "Looking at {location}'s historical data from {} to {}, coverage started at {:.1}% \
         and reached {:.1}% by {}. ",
        first.year, last.year, first.value, last.value, last.year
    );
    text.push_str(&match Movement::classify(change, HISTORY_THRESHOLD) {
        Movement::Rising => format!(
            "That is an increase of {change:.1} percentage points over {years} years, \
             a clear upward trend."
        ),
        Movement::Declining => format!(
            "That is a decrease of {:.1} percentage points over {years} years, \
             a downward trend.",
            change.abs()
        ),
        Movement::Stable => "Values have stayed relatively stable over this period.".to_string(),
    });
    text
}

fn recent_trend(recent: &[Observation]) -> String {
    let (start, end) = match (recent.first(), recent.last()) {
        (Some(start), Some(end)) => (start, end),
        _ => return String::new(),
    };
    let change = if recent.len() >= 2 {
        end.value - start.value
    } else {
        0.0
    };
    let mut text = format!(
        "In the most recent {} years ({}-{}), ",
        recent.len(),
        start.year,
        end.year
    );
    text.push_str(&match Movement::classify(change, RECENT_THRESHOLD) {
        Movement::Rising => format!(
            "coverage has been increasing, from {:.1}% to {:.1}%. \
             Recent upward momentum suggests the trend is likely to continue.",
            start.value, end.value
        ),
        Movement::Declining => format!(
            "coverage has been declining, from {:.1}% to {:.1}%. \
             The decline may continue unless conditions change.",
            start.value, end.value
        ),
        Movement::Stable => "coverage has stayed within a narrow range, \
             so future values will likely stay close to the current level."
            .to_string(),
    });
    text
}

fn projection(last: &Observation, next: &ForecastPoint, fifth: &ForecastPoint) -> String {
    let change = next.predicted - last.value;
    let mut text = format!(
        "Based on this pattern, coverage in {} is projected at about {:.1}%. ",
        next.year, next.predicted
    );
    text.push_str(&match Movement::classify(change, RECENT_THRESHOLD) {
        Movement::Rising => format!(
            "That is {change:.1} percentage points above the {} value of {:.1}%, \
             following the upward trend of recent years. ",
            last.year, last.value
        ),
        Movement::Declining => format!(
            "That is {:.1} percentage points below the {} value of {:.1}%, \
             reflecting the decline in the historical data. ",
            change.abs(),
            last.year,
            last.value
        ),
        Movement::Stable => format!(
            "That is very close to the {} value of {:.1}%, consistent with the stable pattern. ",
            last.year, last.value
        ),
    });
    text.push_str(&format!(
        "By {}, coverage is projected at around {:.1}%.",
        fifth.year, fifth.predicted
    ));
    text
}

fn influential_method(result: &EnsembleResult, kind: EstimatorKind, share: f64) -> String {
    let params = result.methods.get(&kind).and_then(|m| m.params.as_ref());
    let detail = match (kind, params) {
        (EstimatorKind::Linear5Year, Some(params)) => {
            let direction = match params.slope() {
                Some(slope) if slope > 0.0 => "steady upward",
                _ => "steady downward",
            };
            format!(
                "{}, which found a {direction} trend in the most recent years.",
                kind.label()
            )
        }
        (EstimatorKind::Cagr, Some(ModelParams::Cagr(fit))) => format!(
            "{}, which estimated an average annual growth rate of {:.2}%.",
            kind.label(),
            fit.rate_percent().abs()
        ),
        (EstimatorKind::Polynomial, Some(ModelParams::Polynomial(fit))) => format!(
            "{}, which found a curved pattern: the rate of change has been {} over time.",
            kind.label(),
            if fit.r_squared > 0.7 {
                "accelerating or decelerating"
            } else {
                "varying"
            }
        ),
        (EstimatorKind::HoltLinear, _) => format!(
            "{}, which tracks both the level and the trend and adapts to recent changes.",
            kind.label()
        ),
        (EstimatorKind::Arima111, _) => format!(
            "{}, which models year-over-year changes with autoregressive and moving-average terms.",
            kind.label()
        ),
        _ => format!("{}.", kind.label()),
    };

    format!(
        "Several methods were blended; the most influential was {detail} \
         It contributed {:.0}% of the weight for {}.",
        share * 100.0,
        result
            .horizon_points()
            .next()
            .map_or(result.anchor_year + 1, |p| p.year)
    )
}
