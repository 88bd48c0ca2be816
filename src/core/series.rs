//! Annual observation series.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Lower bound of the percentage domain.
pub const MIN_PERCENT: f64 = 0.0;
/// Upper bound of the percentage domain.
pub const MAX_PERCENT: f64 = 100.0;

/// One annual observation: a coverage percentage for a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub year: i32,
    pub value: f64,
}

impl Observation {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

impl From<(i32, f64)> for Observation {
    fn from((year, value): (i32, f64)) -> Self {
        Self { year, value }
    }
}

/// A validated annual series: sorted by year, one observation per year,
/// every value a finite percentage.
///
/// Years need not be contiguous. Operations that talk about "year-over-year"
/// changes work on consecutive observations, as the source data does.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnnualSeries {
    observations: Vec<Observation>,
}

impl AnnualSeries {
    /// Build a series from observations in any order.
    ///
    /// # Errors
    /// * [`ForecastError::InvalidObservation`] for non-finite or out-of-range values
    /// * [`ForecastError::DuplicateYear`] when two observations share a year
    pub fn new(mut observations: Vec<Observation>) -> Result<Self> {
        for obs in &observations {
            if !obs.value.is_finite() || !(MIN_PERCENT..=MAX_PERCENT).contains(&obs.value) {
                return Err(ForecastError::InvalidObservation {
                    year: obs.year,
                    value: obs.value,
                });
            }
        }

        observations.sort_by_key(|o| o.year);

        if let Some(w) = observations.windows(2).find(|w| w[0].year == w[1].year) {
            return Err(ForecastError::DuplicateYear(w[0].year));
        }

        Ok(Self { observations })
    }

    /// Build a series from `(year, value)` pairs.
    pub fn from_pairs(pairs: &[(i32, f64)]) -> Result<Self> {
        Self::new(pairs.iter().copied().map(Observation::from).collect())
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    pub fn years(&self) -> Vec<i32> {
        self.observations.iter().map(|o| o.year).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// The most recent `n` observations (all of them when shorter).
    pub fn recent(&self, n: usize) -> &[Observation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }

    /// Differences between consecutive observations.
    pub fn changes(&self) -> Vec<f64> {
        year_over_year(&self.observations)
    }

    /// Number of calendar years between the first and last observation.
    pub fn span_years(&self) -> i32 {
        match (self.first(), self.last()) {
            (Some(f), Some(l)) => l.year - f.year,
            _ => 0,
        }
    }
}

impl TryFrom<Vec<Observation>> for AnnualSeries {
    type Error = ForecastError;

    fn try_from(observations: Vec<Observation>) -> Result<Self> {
        Self::new(observations)
    }
}

/// Clamp a model output into the percentage domain.
pub fn clamp_percent(value: f64) -> f64 {
    value.max(MIN_PERCENT).min(MAX_PERCENT)
}

/// Differences between consecutive observations of a slice.
pub fn year_over_year(observations: &[Observation]) -> Vec<f64> {
    observations
        .windows(2)
        .map(|w| w[1].value - w[0].value)
        .collect()
}
