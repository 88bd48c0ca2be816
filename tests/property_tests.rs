//! Property-based tests for the estimators and the ensemble.
//!
//! These tests verify invariants that should hold for every valid series,
//! using randomly generated annual coverage data.

use coverage_forecast::core::AnnualSeries;
use coverage_forecast::features::{analyze_trend, TrendDirection};
use coverage_forecast::models::baseline::MovingAverage;
use coverage_forecast::models::ensemble::{compute_forecast, EnsembleConfig, EnsembleForecaster};
use coverage_forecast::models::{Estimator, EstimatorRegistry};
use proptest::prelude::*;

const FIRST_YEAR: i32 = 2006;

/// Consecutive annual series starting in 2006.
fn make_series(values: &[f64]) -> AnnualSeries {
    let pairs: Vec<(i32, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (FIRST_YEAR + i as i32, v))
        .collect();
    AnnualSeries::from_pairs(&pairs).unwrap()
}

/// Any percentages, 3 to 17 years long.
fn coverage_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..=100.0_f64, 3..=17)
}

/// Noisy linear trends, clamped into the percentage domain.
fn trending_strategy() -> impl Strategy<Value = Vec<f64>> {
    (3usize..=17).prop_flat_map(|len| {
        (
            40.0..95.0_f64,
            -2.0..2.0_f64,
            prop::collection::vec(-1.0..1.0_f64, len),
        )
            .prop_map(|(base, slope, noise)| {
                noise
                    .iter()
                    .enumerate()
                    .map(|(i, n)| (base + slope * i as f64 + n).clamp(0.0, 100.0))
                    .collect()
            })
    })
}

fn all_estimators() -> EstimatorRegistry {
    let mut registry = EstimatorRegistry::standard();
    registry.register(Box::new(MovingAverage::default()));
    registry
}

// =============================================================================
// Property: estimator output stays in the percentage domain
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn estimators_stay_within_percent_bounds(
        values in coverage_strategy(),
        horizon in 1usize..10
    ) {
        let series = make_series(&values);
        let anchor = series.last().unwrap().year;
        for estimator in all_estimators().iter() {
            let result = estimator.estimate(&series, horizon, anchor);
            if result.is_fitted() {
                prop_assert_eq!(result.forecast.len(), horizon);
            } else {
                prop_assert!(result.forecast.is_empty());
            }
            for point in &result.forecast {
                prop_assert!(
                    (0.0..=100.0).contains(&point.predicted),
                    "{} predicted {}", estimator.kind(), point.predicted
                );
            }
        }
    }
}

// =============================================================================
// Property: ensemble output is bounded and chained
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ensemble_stays_within_realistic_range(
        values in coverage_strategy(),
        horizon in 1usize..10
    ) {
        let series = make_series(&values);
        let result = compute_forecast(&series, horizon).unwrap();
        let realistic_max = EnsembleConfig::default().realistic_max;
        for point in &result.forecast {
            prop_assert!(point.predicted >= 0.0 && point.predicted <= realistic_max);
            let lower = point.lower_bound.unwrap();
            let upper = point.upper_bound.unwrap();
            prop_assert!(lower >= 0.0 && upper <= realistic_max);
        }
    }

    #[test]
    fn ensemble_years_are_contiguous(
        values in trending_strategy(),
        horizon in 1usize..10
    ) {
        let series = make_series(&values);
        let last_year = series.last().unwrap().year;
        let result = compute_forecast(&series, horizon).unwrap();

        let anchor = EnsembleConfig::default().anchor_year;
        let gap = (anchor - last_year) as usize;
        prop_assert_eq!(result.forecast.len(), gap + horizon);
        prop_assert_eq!(result.gap_points().count(), gap);
        for (i, point) in result.forecast.iter().enumerate() {
            prop_assert_eq!(point.year, last_year + 1 + i as i32);
        }
    }

    #[test]
    fn consecutive_changes_respect_yearly_caps(
        values in prop::collection::vec(0.0..=96.0_f64, 3..=17),
        horizon in 1usize..10
    ) {
        let config = EnsembleConfig::default();
        let series = make_series(&values);
        let result = EnsembleForecaster::new(config.clone())
            .forecast(&series, horizon)
            .unwrap();

        // Points are rounded to a tenth; the chain runs on unrounded values.
        let slack = 0.1 + 1e-9;
        let mut previous = series.last().unwrap().value;
        for point in &result.forecast {
            let delta = point.predicted - previous;
            prop_assert!(delta <= config.max_rise + slack, "rise {} in {}", delta, point.year);
            prop_assert!(delta >= -config.max_fall - slack, "fall {} in {}", delta, point.year);
            previous = point.predicted;
        }
    }

    #[test]
    fn ensemble_is_deterministic(values in coverage_strategy()) {
        let series = make_series(&values);
        let first = compute_forecast(&series, 5).unwrap();
        let second = compute_forecast(&series, 5).unwrap();
        prop_assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }
}

// =============================================================================
// Property: trend analysis
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn trend_strength_is_a_fraction(values in coverage_strategy()) {
        let trend = analyze_trend(&make_series(&values));
        prop_assert!((0.0..=1.0).contains(&trend.strength));
        prop_assert_ne!(trend.direction, TrendDirection::InsufficientData);
    }

    #[test]
    fn small_changes_are_stable(base in 50.0..95.0_f64, drift in -0.4..0.4_f64) {
        let series = make_series(&[base, base + drift / 2.0, base + drift]);
        prop_assert_eq!(analyze_trend(&series).direction, TrendDirection::Stable);
    }
}
