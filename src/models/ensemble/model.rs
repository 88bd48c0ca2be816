//! Sequential ensemble blender.
//!
//! Each year blends a decayed trend step from the previous ensemble value with
//! the weighted average of the estimator values for that year. Years between
//! the last observation and the anchor year are bridged first, using each
//! model's own projection, and are flagged as gap years.

use super::config::{EnsembleConfig, VariationPhase};
use super::rates::TrendRates;
use super::score::method_score;
use super::weighting::{trend_projection, weigh_method, weighted_average, YearContext};
use crate::core::{AnnualSeries, ForecastPoint, MethodContribution};
use crate::error::{ForecastError, Result};
use crate::models::{
    EstimatorKind, EstimatorRegistry, EstimatorResult, ModelParams, QualitySignal,
};
use crate::utils::stats::round_tenth;
use log::{debug, trace};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-estimator summary reported alongside the ensemble forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSummary {
    pub fitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ModelParams>,
    pub quality: QualitySignal,
    /// Alignment with the recent trend, in `[0.05, 1]`.
    pub score: f64,
}

/// Rates that drove the blend, in the shape the chart layer reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleWeights {
    /// The conservative trend rate.
    pub recent_trend_rate: f64,
}

/// Output of the ensemble blender.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleResult {
    /// Gap-year points followed by the requested horizon.
    pub forecast: Vec<ForecastPoint>,
    pub methods: BTreeMap<EstimatorKind, MethodSummary>,
    pub weights: EnsembleWeights,
    pub rates: TrendRates,
    pub anchor_year: i32,
}

impl EnsembleResult {
    /// Points between the last observation and the anchor year.
    pub fn gap_points(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.forecast.iter().filter(|p| p.is_gap_year)
    }

    /// Points for the requested horizon.
    pub fn horizon_points(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.forecast.iter().filter(|p| !p.is_gap_year)
    }

    /// Estimator with the largest weight share in the first requested year.
    pub fn most_influential(&self) -> Option<(EstimatorKind, f64)> {
        self.horizon_points()
            .next()?
            .method_shares()
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Ensemble forecaster over a registry of estimators.
///
/// # Example
///
/// ```
/// use coverage_forecast::core::AnnualSeries;
/// use coverage_forecast::models::ensemble::{EnsembleConfig, EnsembleForecaster};
///
/// let series = AnnualSeries::from_pairs(&[
///     (2018, 80.0), (2019, 82.0), (2020, 83.0), (2021, 85.0), (2022, 87.0),
/// ]).unwrap();
///
/// let result = EnsembleForecaster::new(EnsembleConfig::default())
///     .forecast(&series, 5)
///     .unwrap();
///
/// // 2023-2025 bridge the gap to the anchor year, then 2026-2030.
/// assert_eq!(result.forecast.len(), 8);
/// assert!(result.forecast.iter().all(|p| p.predicted <= 96.0));
/// ```
pub struct EnsembleForecaster {
    config: EnsembleConfig,
    registry: EstimatorRegistry,
}

impl EnsembleForecaster {
    /// Forecaster over the standard estimators.
    pub fn new(config: EnsembleConfig) -> Self {
        Self {
            config,
            registry: EstimatorRegistry::standard(),
        }
    }

    /// Replace the estimator set.
    pub fn with_registry(mut self, registry: EstimatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    pub fn registry(&self) -> &EstimatorRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> EstimatorRegistry {
        self.registry
    }

    /// Blend all estimators into gap-year points plus `horizon` yearly points.
    ///
    /// # Errors
    /// * [`ForecastError::InsufficientHistory`] for series shorter than `min_history`
    /// * [`ForecastError::InvalidParameter`] for a zero horizon, an invalid
    ///   config, or an anchor year before the last observation
    pub fn forecast(&self, series: &AnnualSeries, horizon: usize) -> Result<EnsembleResult> {
        self.forecast_anchored(series, horizon, self.config.anchor_year)
    }

    /// [`EnsembleForecaster::forecast`] with an explicit anchor year in place
    /// of the configured one.
    ///
    /// # Errors
    /// See [`EnsembleForecaster::forecast`].
    pub fn forecast_anchored(
        &self,
        series: &AnnualSeries,
        horizon: usize,
        anchor_year: i32,
    ) -> Result<EnsembleResult> {
        let config = &self.config;
        config.validate()?;

        if series.len() < config.min_history {
            return Err(ForecastError::InsufficientHistory {
                needed: config.min_history,
                got: series.len(),
            });
        }
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be at least 1".to_string(),
            ));
        }
        let last = *series.last().ok_or(ForecastError::EmptyData)?;
        if anchor_year < last.year {
            return Err(ForecastError::InvalidParameter(format!(
                "anchor year {} precedes the last observation in {}",
                anchor_year, last.year
            )));
        }

        let rates = TrendRates::from_series(series, config);
        debug!(
            "trend rates: recent {:.3}, long-term {:.3}, conservative {:.3}, volatility {:.3}",
            rates.recent_trend_rate,
            rates.long_term_trend_rate,
            rates.conservative_rate,
            rates.volatility
        );

        let results = self
            .registry
            .estimate_all(series, horizon, anchor_year);
        for result in &results {
            debug!("{}: fitted = {}", result.kind, result.is_fitted());
        }

        let gap_count = anchor_year - last.year;
        debug!("bridging {gap_count} gap years to {}", anchor_year);

        let mut blender = YearBlender {
            config,
            rates: &rates,
            last_value: last.value,
            previous: last.value,
        };
        let mut forecast = Vec::with_capacity(gap_count as usize + horizon);

        for gap in 1..=gap_count {
            let year = last.year + gap;
            let candidates = results.iter().filter_map(|result| {
                let params = result.params.as_ref()?;
                Some(Candidate {
                    kind: result.kind,
                    value: params.project(year, last.year),
                    r_squared: params.r_squared(),
                    confidence: params.confidence(),
                })
            });
            let mut point = blender.blend(year, gap, (gap - 1) as usize, candidates);
            point.is_gap_year = true;
            forecast.push(point);
        }

        for step in 0..horizon {
            let year = anchor_year + step as i32 + 1;
            let years_from_last = gap_count + step as i32 + 1;
            let index = match config.variation_phase {
                VariationPhase::Restart => step,
                VariationPhase::Continuous => gap_count as usize + step,
            };
            let candidates = results.iter().filter_map(|result| {
                let params = result.params.as_ref()?;
                let point = result.point(step)?;
                Some(Candidate {
                    kind: result.kind,
                    value: point.predicted,
                    r_squared: params.r_squared(),
                    confidence: point.confidence,
                })
            });
            forecast.push(blender.blend(year, years_from_last, index, candidates));
        }

        let methods = results
            .iter()
            .map(|result| {
                let summary = MethodSummary {
                    fitted: result.is_fitted(),
                    params: result.params.clone(),
                    quality: result.quality(),
                    score: method_score(result, series),
                };
                (result.kind, summary)
            })
            .collect();

        Ok(EnsembleResult {
            forecast,
            methods,
            weights: EnsembleWeights {
                recent_trend_rate: rates.conservative_rate,
            },
            rates,
            anchor_year: anchor_year,
        })
    }
}

/// Forecast with the default configuration and the standard estimators.
///
/// # Errors
/// See [`EnsembleForecaster::forecast`].
pub fn compute_forecast(series: &AnnualSeries, horizon: usize) -> Result<EnsembleResult> {
    EnsembleForecaster::new(EnsembleConfig::default()).forecast(series, horizon)
}

/// One estimator value offered for a blended year.
struct Candidate {
    kind: EstimatorKind,
    value: f64,
    r_squared: Option<f64>,
    confidence: Option<f64>,
}

/// Carries the unrounded ensemble value from one year to the next.
struct YearBlender<'a> {
    config: &'a EnsembleConfig,
    rates: &'a TrendRates,
    last_value: f64,
    previous: f64,
}

impl YearBlender<'_> {
    fn blend(
        &mut self,
        year: i32,
        years_from_last: i32,
        index: usize,
        candidates: impl Iterator<Item = Candidate>,
    ) -> ForecastPoint {
        let config = self.config;
        let rate = self.rates.conservative_rate;
        let volatility = self.rates.volatility;
        let base = self.previous;

        let ctx = YearContext {
            base,
            trend: trend_projection(base, rate, years_from_last, config),
            rate,
            years_from_last,
            last_value: self.last_value,
        };

        let contributions: Vec<MethodContribution> = candidates
            .filter_map(|c| weigh_method(c.kind, c.value, c.r_squared, c.confidence, &ctx, config))
            .collect();
        let method_average = weighted_average(&contributions, base);

        let amplification = (1.0 + volatility / config.variation_volatility_divisor)
            .min(config.variation_cap);
        let variation = (index as f64 * config.variation_frequency).sin()
            * volatility
            * amplification
            * config.variation_scale;
        let blended = ctx.trend * config.trend_share
            + method_average * (1.0 - config.trend_share)
            + variation;

        let value = self.constrain(blended, base, years_from_last);

        let se = volatility * f64::from(years_from_last).sqrt();
        let lower = (value - config.interval_multiplier * se).max(0.0);
        let upper = (value + config.interval_multiplier * se).min(config.realistic_max);

        trace!(
            "{year}: base {base:.3}, trend {:.3}, methods {method_average:.3} ({} kept), value {value:.3}",
            ctx.trend,
            contributions.len()
        );

        self.previous = value;

        let mut point = ForecastPoint::new(year, round_tenth(value))
            .with_confidence(self.rates.confidence)
            .with_interval(round_tenth(lower), round_tenth(upper));
        point.methods = contributions;
        point
    }

    /// Apply the ceiling, the yearly change band and the high-level headroom cap.
    fn constrain(&self, blended: f64, base: f64, years_from_last: i32) -> f64 {
        let config = self.config;
        let rate = self.rates.conservative_rate.abs();
        let volatility = self.rates.volatility;

        let mut value = blended.min(config.realistic_max);

        let max_rise = config.max_rise.min(rate * config.rise_rate_factor + volatility);
        let max_fall = config.max_fall.min(rate * config.fall_rate_factor + volatility);
        value = value.min(base + max_rise).max(base - max_fall);

        if base > config.headroom_threshold {
            let headroom = (100.0 - base)
                * config.headroom_share
                * (-f64::from(years_from_last) * config.headroom_decay).exp();
            value = value.min(base + headroom);
        }

        value.min(config.realistic_max).max(0.0)
    }
}
