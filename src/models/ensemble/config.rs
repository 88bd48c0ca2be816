//! Ensemble configuration.

use crate::error::{ForecastError, Result};
use crate::models::EstimatorKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Year treated as "now" unless the caller anchors elsewhere.
pub const DEFAULT_ANCHOR_YEAR: i32 = 2025;

/// How the deterministic variation term indexes years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationPhase {
    /// The index counts gap years from 0, then restarts at 0 for the
    /// requested horizon.
    #[default]
    Restart,
    /// One index runs across gap and horizon years.
    Continuous,
}

/// Weight penalty applied to implausible method values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyBand {
    /// Values above this are penalized.
    pub above: f64,
    /// Values more than this many points below the last observation are penalized.
    pub below_last: f64,
    /// Weight multiplier.
    pub factor: f64,
}

impl PenaltyBand {
    pub fn applies(&self, value: f64, last_value: f64) -> bool {
        value > self.above || value < last_value - self.below_last
    }
}

/// Configuration for the ensemble blender.
///
/// Every numeric constant of the blend lives here so hosts can tune it
/// without code changes; the defaults reproduce the published behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Last year treated as already elapsed; forecasts start the year after.
    pub anchor_year: i32,
    /// Shortest series the ensemble accepts.
    pub min_history: usize,
    /// Observations used for the recent trend.
    pub recent_window: usize,
    /// Share of the recent rate in the base rate; the long-term rate gets the rest.
    pub recent_rate_share: f64,
    /// Ceiling for ensemble values and cap point for method values.
    pub realistic_max: f64,

    /// Per-year exponential decay of the trend step.
    pub trend_decay: f64,
    /// Level above which rising trends saturate.
    pub saturation_start: f64,
    /// Distance over which saturation reaches full strength.
    pub saturation_span: f64,
    /// Largest fractional slowdown from saturation.
    pub saturation_strength: f64,

    /// Scale of the exponential decay applied to method values above the ceiling.
    pub excess_decay: f64,
    /// Multiplier turning R² or confidence into a base weight.
    pub quality_scale: f64,
    /// Lower bound (and fallback) for the base weight.
    pub min_base_weight: f64,
    /// Weight multiplier for a method at the maximum distance from the trend.
    pub alignment_floor: f64,
    /// Smallest distance from the trend that counts as full misalignment.
    pub alignment_min_spread: f64,
    /// Rate multiplier for the misalignment distance.
    pub alignment_rate_factor: f64,
    /// Strong penalty, checked first.
    pub severe_penalty: PenaltyBand,
    /// Light penalty, checked when the strong one does not apply.
    pub mild_penalty: PenaltyBand,
    /// Weight multipliers per estimator; unlisted estimators use 1.0.
    pub preferences: BTreeMap<EstimatorKind, f64>,
    /// Methods whose final weight is at or below this are dropped.
    pub drop_threshold: f64,

    /// Share of the trend projection in the blend; methods get the rest.
    pub trend_share: f64,
    /// Angular step of the variation term per index.
    pub variation_frequency: f64,
    /// Fraction of the volatility used as variation amplitude.
    pub variation_scale: f64,
    /// Cap on the volatility amplification factor.
    pub variation_cap: f64,
    /// Volatility divisor in the amplification factor.
    pub variation_volatility_divisor: f64,
    pub variation_phase: VariationPhase,

    /// Largest yearly rise.
    pub max_rise: f64,
    /// Rate multiplier for the yearly rise bound.
    pub rise_rate_factor: f64,
    /// Largest yearly fall.
    pub max_fall: f64,
    /// Rate multiplier for the yearly fall bound.
    pub fall_rate_factor: f64,
    /// Level above which growth is limited to a share of the headroom.
    pub headroom_threshold: f64,
    /// Share of the remaining headroom available per year.
    pub headroom_share: f64,
    /// Per-year decay of the headroom share.
    pub headroom_decay: f64,

    /// Multiplier of the standard error for interval bounds.
    pub interval_multiplier: f64,
    /// Confidence when recent changes are too few to assess.
    pub default_confidence: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        let preferences = BTreeMap::from([
            (EstimatorKind::Linear5Year, 1.15),
            (EstimatorKind::Cagr, 1.15),
            (EstimatorKind::HoltLinear, 1.05),
            (EstimatorKind::Polynomial, 1.05),
            (EstimatorKind::Arima111, 0.95),
        ]);

        Self {
            anchor_year: DEFAULT_ANCHOR_YEAR,
            min_history: 3,
            recent_window: 5,
            recent_rate_share: 0.7,
            realistic_max: 96.0,
            trend_decay: 0.05,
            saturation_start: 80.0,
            saturation_span: 20.0,
            saturation_strength: 0.4,
            excess_decay: 3.0,
            quality_scale: 0.6,
            min_base_weight: 0.1,
            alignment_floor: 0.4,
            alignment_min_spread: 8.0,
            alignment_rate_factor: 2.5,
            severe_penalty: PenaltyBand {
                above: 97.0,
                below_last: 8.0,
                factor: 0.4,
            },
            mild_penalty: PenaltyBand {
                above: 94.0,
                below_last: 5.0,
                factor: 0.7,
            },
            preferences,
            drop_threshold: 0.01,
            trend_share: 0.6,
            variation_frequency: 0.7,
            variation_scale: 0.25,
            variation_cap: 1.2,
            variation_volatility_divisor: 3.0,
            variation_phase: VariationPhase::Restart,
            max_rise: 4.0,
            rise_rate_factor: 1.8,
            max_fall: 3.0,
            fall_rate_factor: 1.5,
            headroom_threshold: 90.0,
            headroom_share: 0.25,
            headroom_decay: 0.15,
            interval_multiplier: 1.5,
            default_confidence: 0.7,
            min_confidence: 0.5,
            max_confidence: 0.9,
        }
    }
}

impl EnsembleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anchor_year(mut self, year: i32) -> Self {
        self.anchor_year = year;
        self
    }

    pub fn with_min_history(mut self, min_history: usize) -> Self {
        self.min_history = min_history;
        self
    }

    pub fn with_recent_window(mut self, window: usize) -> Self {
        self.recent_window = window;
        self
    }

    pub fn with_realistic_max(mut self, max: f64) -> Self {
        self.realistic_max = max;
        self
    }

    pub fn with_variation_phase(mut self, phase: VariationPhase) -> Self {
        self.variation_phase = phase;
        self
    }

    /// Set the weight multiplier for one estimator.
    pub fn with_preference(mut self, kind: EstimatorKind, multiplier: f64) -> Self {
        self.preferences.insert(kind, multiplier);
        self
    }

    pub fn with_trend_share(mut self, share: f64) -> Self {
        self.trend_share = share;
        self
    }

    /// Set the yearly rise and fall caps.
    pub fn with_yearly_change_caps(mut self, max_rise: f64, max_fall: f64) -> Self {
        self.max_rise = max_rise;
        self.max_fall = max_fall;
        self
    }

    /// Weight multiplier for `kind`.
    pub fn preference(&self, kind: EstimatorKind) -> f64 {
        self.preferences.get(&kind).copied().unwrap_or(1.0)
    }

    /// Check that every field is usable.
    ///
    /// # Errors
    /// [`ForecastError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        fn invalid(message: String) -> Result<()> {
            Err(ForecastError::InvalidParameter(message))
        }

        if self.min_history < 2 {
            return invalid(format!("min_history must be at least 2, got {}", self.min_history));
        }
        if self.recent_window < 2 {
            return invalid(format!(
                "recent_window must be at least 2, got {}",
                self.recent_window
            ));
        }
        if self.realistic_max.is_nan() || self.realistic_max <= 0.0 || self.realistic_max > 100.0 {
            return invalid(format!(
                "realistic_max must be in (0, 100], got {}",
                self.realistic_max
            ));
        }

        let shares = [
            ("recent_rate_share", self.recent_rate_share),
            ("trend_share", self.trend_share),
            ("alignment_floor", self.alignment_floor),
            ("saturation_strength", self.saturation_strength),
            ("headroom_share", self.headroom_share),
            ("min_confidence", self.min_confidence),
            ("max_confidence", self.max_confidence),
            ("default_confidence", self.default_confidence),
        ];
        if let Some((name, value)) = shares
            .into_iter()
            .find(|&(_, v)| !(0.0..=1.0).contains(&v))
        {
            return invalid(format!("{name} must be in [0, 1], got {value}"));
        }
        if self.min_confidence > self.max_confidence {
            return invalid(format!(
                "min_confidence {} exceeds max_confidence {}",
                self.min_confidence, self.max_confidence
            ));
        }

        let positive = [
            ("excess_decay", self.excess_decay),
            ("saturation_span", self.saturation_span),
            ("alignment_min_spread", self.alignment_min_spread),
            ("variation_volatility_divisor", self.variation_volatility_divisor),
        ];
        if let Some((name, value)) = positive
            .into_iter()
            .find(|&(_, v)| v.is_nan() || v <= 0.0)
        {
            return invalid(format!("{name} must be positive, got {value}"));
        }

        let non_negative = [
            ("trend_decay", self.trend_decay),
            ("quality_scale", self.quality_scale),
            ("min_base_weight", self.min_base_weight),
            ("alignment_rate_factor", self.alignment_rate_factor),
            ("drop_threshold", self.drop_threshold),
            ("variation_scale", self.variation_scale),
            ("variation_cap", self.variation_cap),
            ("max_rise", self.max_rise),
            ("rise_rate_factor", self.rise_rate_factor),
            ("max_fall", self.max_fall),
            ("fall_rate_factor", self.fall_rate_factor),
            ("headroom_decay", self.headroom_decay),
            ("interval_multiplier", self.interval_multiplier),
            ("severe_penalty.factor", self.severe_penalty.factor),
            ("mild_penalty.factor", self.mild_penalty.factor),
        ];
        if let Some((name, value)) = non_negative
            .into_iter()
            .find(|&(_, v)| v.is_nan() || v < 0.0)
        {
            return invalid(format!("{name} must be non-negative, got {value}"));
        }

        if let Some((kind, value)) = self
            .preferences
            .iter()
            .map(|(&kind, &value)| (kind, value))
            .find(|&(_, v)| v.is_nan() || v < 0.0)
        {
            return invalid(format!("preference for {kind} must be non-negative, got {value}"));
        }

        Ok(())
    }
}
