//! Ensemble forecasting.
//!
//! Blends the point estimators with a deterministic trend projection,
//! sequentially and year by year, under realistic-ceiling and yearly-change
//! constraints.

mod config;
mod model;
mod rates;
mod score;
mod weighting;

pub use config::{EnsembleConfig, PenaltyBand, VariationPhase, DEFAULT_ANCHOR_YEAR};
pub use model::{
    compute_forecast, EnsembleForecaster, EnsembleResult, EnsembleWeights, MethodSummary,
};
pub use rates::TrendRates;
pub use score::method_score;
pub use weighting::{
    alignment_multiplier, base_weight, cap_value, penalty_multiplier, trend_projection,
    weigh_method, weighted_average, YearContext,
};
