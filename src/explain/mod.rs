//! Human-readable summaries of ensemble forecasts.
//!
//! [`ForecastReport`] is the one-paragraph summary shown next to a chart;
//! [`Explanation`] is the longer plain-text account of why the forecast looks
//! the way it does. Neither produces markup.

pub mod narrative;
pub mod summary;

pub use narrative::{Explanation, Movement, Section, SectionKind};
pub use summary::ForecastReport;

/// Index of the "five years out" point within the requested horizon.
const FIFTH_YEAR: usize = 4;
