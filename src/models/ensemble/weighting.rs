//! Per-year trend projection and method weighting.

use super::config::EnsembleConfig;
use crate::core::MethodContribution;
use crate::models::EstimatorKind;

/// Inputs shared by every method weight in one blended year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearContext {
    /// Previous year's unrounded ensemble value (the last observation at first).
    pub base: f64,
    /// Trend projection for this year.
    pub trend: f64,
    /// Conservative trend rate.
    pub rate: f64,
    /// Years between the last observation and this year.
    pub years_from_last: i32,
    /// Last observed value.
    pub last_value: f64,
}

/// One-year trend step from `base`, decayed with distance and saturated near
/// the top of the range for rising rates.
pub fn trend_projection(base: f64, rate: f64, years_from_last: i32, config: &EnsembleConfig) -> f64 {
    let decay = (-f64::from(years_from_last) * config.trend_decay).exp();
    let saturation = if base > config.saturation_start && rate > 0.0 {
        1.0 - ((base - config.saturation_start) / config.saturation_span) * config.saturation_strength
    } else {
        1.0
    };
    base + rate * decay * saturation
}

/// Pull values above the realistic maximum back toward it and floor at zero.
///
/// An excess `e` becomes `e · exp(-e / excess_decay)`.
pub fn cap_value(value: f64, config: &EnsembleConfig) -> f64 {
    let capped = if value > config.realistic_max {
        let excess = value - config.realistic_max;
        config.realistic_max + excess * (-excess / config.excess_decay).exp()
    } else {
        value
    };
    capped.max(0.0)
}

/// Weight from model quality: R² when positive, otherwise confidence.
pub fn base_weight(r_squared: Option<f64>, confidence: Option<f64>, config: &EnsembleConfig) -> f64 {
    let floor = config.min_base_weight;
    match (r_squared, confidence) {
        (Some(r2), _) if r2 > 0.0 => (r2 * config.quality_scale).max(floor),
        (_, Some(c)) if c > 0.0 => (c * config.quality_scale).max(floor),
        _ => floor,
    }
}

/// Multiplier in `[alignment_floor, 1]` rewarding values close to the trend.
pub fn alignment_multiplier(value: f64, ctx: &YearContext, config: &EnsembleConfig) -> f64 {
    let spread = config
        .alignment_min_spread
        .max((ctx.rate * f64::from(ctx.years_from_last) * config.alignment_rate_factor).abs());
    let score = 1.0 - ((value - ctx.trend).abs() / spread).min(1.0);
    config.alignment_floor + score * (1.0 - config.alignment_floor)
}

/// Multiplier penalizing values that are too high or drop too far.
pub fn penalty_multiplier(value: f64, last_value: f64, config: &EnsembleConfig) -> f64 {
    if config.severe_penalty.applies(value, last_value) {
        config.severe_penalty.factor
    } else if config.mild_penalty.applies(value, last_value) {
        config.mild_penalty.factor
    } else {
        1.0
    }
}

/// Cap and weigh one method value; `None` when the weight is dropped.
pub fn weigh_method(
    kind: EstimatorKind,
    raw_value: f64,
    r_squared: Option<f64>,
    confidence: Option<f64>,
    ctx: &YearContext,
    config: &EnsembleConfig,
) -> Option<MethodContribution> {
    let value = cap_value(raw_value, config);
    let weight = base_weight(r_squared, confidence, config)
        * alignment_multiplier(value, ctx, config)
        * penalty_multiplier(value, ctx.last_value, config)
        * config.preference(kind);

    (weight > config.drop_threshold).then_some(MethodContribution { kind, value, weight })
}

/// Weighted mean of the contributions, or `fallback` when none carry weight.
pub fn weighted_average(contributions: &[MethodContribution], fallback: f64) -> f64 {
    let total: f64 = contributions.iter().map(|c| c.weight).sum();
    if contributions.is_empty() || total <= 0.0 {
        return fallback;
    }
    contributions.iter().map(|c| c.value * c.weight).sum::<f64>() / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn context(trend: f64) -> YearContext {
        YearContext {
            base: 87.0,
            trend,
            rate: 1.75,
            years_from_last: 1,
            last_value: 87.0,
        }
    }

    #[test]
    fn test_trend_projection_saturates_rising_rates_only() {
        let config = EnsembleConfig::default();
        let decay = (-0.05_f64).exp();

        // base 87: saturation 1 - (7/20)*0.4 = 0.86
        assert_relative_eq!(
            trend_projection(87.0, 1.75, 1, &config),
            87.0 + 1.75 * decay * 0.86,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            trend_projection(87.0, -1.0, 1, &config),
            87.0 - decay,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            trend_projection(70.0, 1.0, 2, &config),
            70.0 + (-0.1_f64).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cap_value_decays_excess() {
        let config = EnsembleConfig::default();
        assert_eq!(cap_value(90.0, &config), 90.0);
        assert_relative_eq!(cap_value(99.0, &config), 96.0 + 3.0 * (-1.0_f64).exp(), epsilon = 1e-12);
        assert_eq!(cap_value(-2.0, &config), 0.0);
        // The decayed excess never exceeds excess_decay / e.
        assert!(cap_value(100.0, &config) < 96.0 + 3.0 / std::f64::consts::E + 1e-12);
    }

    #[test]
    fn test_base_weight_fallbacks() {
        let config = EnsembleConfig::default();
        assert_relative_eq!(base_weight(Some(0.9), Some(0.9), &config), 0.54, epsilon = 1e-12);
        assert_relative_eq!(base_weight(Some(0.1), None, &config), 0.1, epsilon = 1e-12);
        assert_relative_eq!(base_weight(Some(-0.2), Some(0.75), &config), 0.45, epsilon = 1e-12);
        assert_relative_eq!(base_weight(None, Some(0.72), &config), 0.432, epsilon = 1e-12);
        assert_relative_eq!(base_weight(None, None, &config), 0.1, epsilon = 1e-12);
        assert_relative_eq!(base_weight(Some(0.0), Some(0.0), &config), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_alignment_multiplier_range() {
        let config = EnsembleConfig::default();
        let ctx = context(88.0);
        assert_relative_eq!(alignment_multiplier(88.0, &ctx, &config), 1.0, epsilon = 1e-12);
        // spread is max(8, 1.75 * 1 * 2.5) = 8
        assert_relative_eq!(alignment_multiplier(92.0, &ctx, &config), 0.7, epsilon = 1e-12);
        assert_relative_eq!(alignment_multiplier(60.0, &ctx, &config), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_penalty_multiplier_bands() {
        let config = EnsembleConfig::default();
        assert_eq!(penalty_multiplier(97.5, 87.0, &config), 0.4);
        assert_eq!(penalty_multiplier(78.0, 87.0, &config), 0.4);
        assert_eq!(penalty_multiplier(95.0, 87.0, &config), 0.7);
        assert_eq!(penalty_multiplier(81.0, 87.0, &config), 0.7);
        assert_eq!(penalty_multiplier(88.0, 87.0, &config), 1.0);
    }

    #[test]
    fn test_weigh_method_combines_factors() {
        let config = EnsembleConfig::default();
        let ctx = context(88.0);
        let contribution =
            weigh_method(EstimatorKind::Linear5Year, 88.0, Some(0.9), None, &ctx, &config).unwrap();
        assert_relative_eq!(contribution.weight, 0.54 * 1.15, epsilon = 1e-12);
        assert_eq!(contribution.value, 88.0);

        let mut strict = EnsembleConfig::default();
        strict.drop_threshold = 1.0;
        assert!(weigh_method(EstimatorKind::Cagr, 88.0, Some(0.9), None, &ctx, &strict).is_none());
    }

    #[test]
    fn test_weighted_average() {
        let contributions = [
            MethodContribution {
                kind: EstimatorKind::Linear5Year,
                value: 90.0,
                weight: 0.3,
            },
            MethodContribution {
                kind: EstimatorKind::Cagr,
                value: 88.0,
                weight: 0.1,
            },
        ];
        assert_relative_eq!(weighted_average(&contributions, 0.0), 89.5, epsilon = 1e-12);
        assert_eq!(weighted_average(&[], 87.0), 87.0);
    }
}
