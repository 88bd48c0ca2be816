//! End-to-end forecast for one series key.
//!
//! fetch → validated series → ensemble → trend → report and explanation.

use crate::core::{AnnualSeries, Observation};
use crate::error::Result;
use crate::explain::{Explanation, ForecastReport};
use crate::features::{analyze_trend, TrendAnalysis};
use crate::models::ensemble::{
    EnsembleConfig, EnsembleForecaster, EnsembleResult, DEFAULT_ANCHOR_YEAR,
};
use crate::models::EstimatorRegistry;
use crate::provider::{SeriesKey, SeriesProvider, HISTORY_END, HISTORY_START};
use chrono::{Datelike, Utc};
use log::{debug, info};
use serde::Serialize;

/// Default number of forecast years after the anchor.
pub const DEFAULT_HORIZON: usize = 5;

/// One forecast request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub key: SeriesKey,
    pub horizon: usize,
    pub anchor_year: i32,
    /// Display name used in the explanation; the FIPS code when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ForecastRequest {
    pub fn new(key: SeriesKey, horizon: usize) -> Self {
        Self {
            key,
            horizon,
            anchor_year: DEFAULT_ANCHOR_YEAR,
            location: None,
        }
    }

    /// Request anchored at the current calendar year (UTC).
    pub fn anchored_to_today(key: SeriesKey, horizon: usize) -> Self {
        Self::new(key, horizon).with_anchor_year(Utc::now().year())
    }

    pub fn with_anchor_year(mut self, anchor_year: i32) -> Self {
        self.anchor_year = anchor_year;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn location_name(&self) -> &str {
        self.location.as_deref().unwrap_or_else(|| self.key.fips())
    }
}

/// Everything produced for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    pub series: AnnualSeries,
    pub ensemble: EnsembleResult,
    pub trend: TrendAnalysis,
    pub report: ForecastReport,
    pub explanation: Explanation,
}

/// Runs requests against a [`SeriesProvider`].
///
/// # Example
///
/// ```
/// use coverage_forecast::core::Observation;
/// use coverage_forecast::pipeline::{ForecastPipeline, ForecastRequest};
/// use coverage_forecast::provider::{InMemoryProvider, SeriesKey};
///
/// let key = SeriesKey::state("06").unwrap();
/// let history = [(2018, 80.0), (2019, 82.0), (2020, 83.0), (2021, 85.0), (2022, 87.0)]
///     .iter()
///     .map(|&(year, value)| Observation::new(year, value))
///     .collect();
/// let provider = InMemoryProvider::new().with_series(key.clone(), history);
///
/// let output = ForecastPipeline::new(provider)
///     .run(&ForecastRequest::new(key, 5).with_location("California"))
///     .unwrap();
/// assert_eq!(output.ensemble.horizon_points().count(), 5);
/// ```
pub struct ForecastPipeline<P> {
    provider: P,
    forecaster: EnsembleForecaster,
}

impl<P: SeriesProvider> ForecastPipeline<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            forecaster: EnsembleForecaster::new(EnsembleConfig::default()),
        }
    }

    /// Ensemble configuration. Its anchor year is replaced by each request's.
    pub fn with_config(self, config: EnsembleConfig) -> Self {
        let Self {
            provider,
            forecaster,
        } = self;
        Self {
            provider,
            forecaster: EnsembleForecaster::new(config).with_registry(forecaster.into_registry()),
        }
    }

    pub fn with_registry(mut self, registry: EstimatorRegistry) -> Self {
        self.forecaster = self.forecaster.with_registry(registry);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetch, forecast and explain one request.
    ///
    /// # Errors
    /// Provider failures, invalid observations, and every error of
    /// [`EnsembleForecaster::forecast`].
    pub fn run(&self, request: &ForecastRequest) -> Result<PipelineOutput> {
        let series = self.fetch_series(&request.key)?;

        let ensemble = self
            .forecaster
            .forecast_anchored(&series, request.horizon, request.anchor_year)?;

        let trend = analyze_trend(&series);
        let report = ForecastReport::new(&ensemble.forecast, trend);
        let explanation = Explanation::build(&ensemble, &series, request.location_name());

        info!(
            "forecast {}: {} observations, {} gap years, {} horizon years, trend {}",
            request.key,
            series.len(),
            ensemble.gap_points().count(),
            request.horizon,
            trend.direction
        );

        Ok(PipelineOutput {
            series,
            ensemble,
            trend,
            report,
            explanation,
        })
    }

    /// Observations for `key` inside the published SAHIE window.
    fn fetch_series(&self, key: &SeriesKey) -> Result<AnnualSeries> {
        let fetched = self.provider.fetch(key)?;
        let total = fetched.len();
        let observations: Vec<Observation> = fetched
            .into_iter()
            .filter(|o| (HISTORY_START..=HISTORY_END).contains(&o.year))
            .collect();
        if observations.len() < total {
            debug!(
                "{key}: dropped {} observations outside {HISTORY_START}-{HISTORY_END}",
                total - observations.len()
            );
        }
        AnnualSeries::new(observations)
    }
}
