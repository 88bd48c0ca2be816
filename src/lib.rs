//! # coverage-forecast
//!
//! Ensemble forecasting of annual health-insurance coverage (SAHIE) series.
//!
//! Seven simple estimators (linear, Holt, ARIMA(1,1,1), compound growth,
//! quadratic, weighted linear, autoregressive) are fitted to one historical
//! series and blended year by year with a decayed trend projection. The
//! result is bounded to a realistic coverage range, bridged from the last
//! observed year to an anchor year, and summarized for display.
//!
//! ```
//! use coverage_forecast::prelude::*;
//!
//! let series = AnnualSeries::from_pairs(&[
//!     (2018, 80.0), (2019, 82.0), (2020, 83.0), (2021, 85.0), (2022, 87.0),
//! ]).unwrap();
//!
//! let result = compute_forecast(&series, 3).unwrap();
//! let report = ForecastReport::new(&result.forecast, analyze_trend(&series));
//! assert!(report.summary.starts_with("Historical trend is strongly increasing"));
//! ```

// Normal-equation accumulation in utils::linalg indexes by row and column.
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod explain;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{AnnualSeries, ForecastPoint, Observation};
    pub use crate::error::{ForecastError, Result};
    pub use crate::explain::{Explanation, ForecastReport};
    pub use crate::features::{analyze_trend, TrendAnalysis, TrendDirection};
    pub use crate::models::ensemble::{
        compute_forecast, EnsembleConfig, EnsembleForecaster, EnsembleResult,
    };
    pub use crate::models::{Estimator, EstimatorKind, EstimatorRegistry};
    pub use crate::pipeline::{ForecastPipeline, ForecastRequest};
    pub use crate::provider::{InMemoryProvider, SeriesKey, SeriesProvider};
}
