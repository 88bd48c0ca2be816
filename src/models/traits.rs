//! Estimator trait defining the common interface for all point estimators.

use crate::core::{clamp_percent, AnnualSeries, ForecastPoint};
use crate::error::{ForecastError, Result};
use crate::models::arima::Arima111;
use crate::models::autoregressive::Autoregressive;
use crate::models::exponential::HoltLinear;
use crate::models::growth::CompoundGrowth;
use crate::models::kind::{EstimatorKind, EstimatorResult, ModelParams};
use crate::models::regression::{LinearRecent, PolynomialRegression, WeightedLinear};
use log::{debug, warn};

/// Common interface for all point estimators.
///
/// Estimators are stateless: `fit` returns the fitted parameters instead of
/// storing them, so one instance can serve any number of series. The trait is
/// object-safe and can be used with `Box<dyn Estimator>`.
pub trait Estimator: Send + Sync {
    /// Identity of the estimator.
    fn kind(&self) -> EstimatorKind;

    /// Smallest series length the estimator can fit.
    fn min_observations(&self) -> usize;

    /// Fit the model to the series.
    ///
    /// # Errors
    /// * [`ForecastError::InsufficientData`] below [`Estimator::min_observations`]
    /// * [`ForecastError::SingularSystem`] when the regression has no unique solution
    fn fit(&self, series: &AnnualSeries) -> Result<ModelParams>;

    /// Forecast point for `year`, clamped into the percentage domain.
    fn forecast_point(&self, params: &ModelParams, year: i32, last_year: i32) -> ForecastPoint {
        let point = ForecastPoint::new(year, clamp_percent(params.project(year, last_year)));
        match params.confidence() {
            Some(confidence) => point.with_confidence(confidence),
            None => point,
        }
    }

    /// Fit and forecast `anchor_year + 1 ..= anchor_year + horizon`.
    ///
    /// Never fails: a series the model cannot fit yields an empty result.
    fn estimate(&self, series: &AnnualSeries, horizon: usize, anchor_year: i32) -> EstimatorResult {
        let kind = self.kind();
        let params = match self.fit(series) {
            Ok(params) => params,
            Err(err @ ForecastError::SingularSystem { .. }) => {
                warn!("{kind} skipped: {err}");
                return EstimatorResult::empty(kind);
            }
            Err(err) => {
                debug!("{kind} skipped: {err}");
                return EstimatorResult::empty(kind);
            }
        };

        let last_year = match series.last() {
            Some(last) => last.year,
            None => return EstimatorResult::empty(kind),
        };

        let forecast = (1..=horizon)
            .map(|step| self.forecast_point(&params, anchor_year + step as i32, last_year))
            .collect();

        debug!("{kind} fitted on {} observations", series.len());
        EstimatorResult::fitted(forecast, params)
    }
}

/// Type alias for boxed estimator trait objects.
pub type BoxedEstimator = Box<dyn Estimator>;

/// Fail with [`ForecastError::InsufficientData`] when `series` is shorter
/// than `needed`.
pub(crate) fn ensure_observations(series: &AnnualSeries, needed: usize) -> Result<()> {
    if series.len() < needed {
        Err(ForecastError::InsufficientData {
            needed,
            got: series.len(),
        })
    } else {
        Ok(())
    }
}

/// Ordered collection of estimators run by the ensemble.
///
/// # Example
///
/// ```
/// use coverage_forecast::models::{EstimatorKind, EstimatorRegistry};
///
/// let registry = EstimatorRegistry::standard();
/// let kinds: Vec<EstimatorKind> = registry.iter().map(|e| e.kind()).collect();
/// assert_eq!(kinds, EstimatorKind::ENSEMBLE_MEMBERS.to_vec());
/// ```
pub struct EstimatorRegistry {
    estimators: Vec<BoxedEstimator>,
}

impl EstimatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            estimators: Vec::new(),
        }
    }

    /// The seven standard ensemble members with their default parameters.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(LinearRecent::default()));
        registry.register(Box::new(HoltLinear::default()));
        registry.register(Box::new(Arima111));
        registry.register(Box::new(CompoundGrowth));
        registry.register(Box::new(PolynomialRegression::default()));
        registry.register(Box::new(WeightedLinear::default()));
        registry.register(Box::new(Autoregressive::default()));
        registry
    }

    /// Register an estimator. An estimator of an already registered kind
    /// replaces the earlier one.
    pub fn register(&mut self, estimator: BoxedEstimator) {
        let kind = estimator.kind();
        match self.estimators.iter_mut().find(|e| e.kind() == kind) {
            Some(slot) => *slot = estimator,
            None => self.estimators.push(estimator),
        }
    }

    /// Get the number of registered estimators.
    pub fn len(&self) -> usize {
        self.estimators.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.estimators.is_empty()
    }

    /// Iterate over the registered estimators in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Estimator> {
        self.estimators.iter().map(|e| e.as_ref())
    }

    /// Run every estimator once over the series.
    pub fn estimate_all(
        &self,
        series: &AnnualSeries,
        horizon: usize,
        anchor_year: i32,
    ) -> Vec<EstimatorResult> {
        self.iter()
            .map(|estimator| estimator.estimate(series, horizon, anchor_year))
            .collect()
    }
}

impl Default for EstimatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
