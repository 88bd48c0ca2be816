//! Core data structures for annual coverage forecasting.

mod forecast;
mod series;

pub use forecast::{ForecastPoint, MethodContribution};
pub use series::{
    clamp_percent, year_over_year, AnnualSeries, Observation, MAX_PERCENT, MIN_PERCENT,
};
