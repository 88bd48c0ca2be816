//! Descriptive features of historical series.
//!
//! # Example
//!
//! ```
//! use coverage_forecast::core::AnnualSeries;
//! use coverage_forecast::features::{analyze_trend, TrendDirection};
//!
//! let series = AnnualSeries::from_pairs(&[
//!     (2018, 80.0), (2019, 82.0), (2020, 83.0), (2021, 85.0), (2022, 87.0),
//! ]).unwrap();
//!
//! let trend = analyze_trend(&series);
//! assert_eq!(trend.direction, TrendDirection::StrongIncreasing);
//! ```

pub mod trend;

pub use trend::{analyze_trend, TrendAnalysis, TrendDirection};
