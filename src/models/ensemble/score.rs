//! Alignment score of an estimator with the recent trend.

use crate::core::AnnualSeries;
use crate::models::EstimatorResult;

/// Score for unfitted estimators and series too short to judge.
const DEFAULT_SCORE: f64 = 0.1;
/// Score when the model reports neither R² nor confidence.
const UNRATED_SCORE: f64 = 0.3;
/// Recent changes within this band have no direction.
const DIRECTION_THRESHOLD: f64 = 0.5;
/// Recent change at which the direction bonus is fully earned.
const FULL_STRENGTH_CHANGE: f64 = 5.0;
const MAX_DIRECTION_BONUS: f64 = 0.3;
/// Contradicting forecasts are halved when the recent change exceeds this.
const CONTRADICTION_CHANGE: f64 = 2.0;
const SLOPE_BONUS: f64 = 1.2;
const SLOPE_MIN_R_SQUARED: f64 = 0.5;

fn direction(value: f64, threshold: f64) -> i8 {
    if value > threshold {
        1
    } else if value < -threshold {
        -1
    } else {
        0
    }
}

/// Rate how well an estimator's fit and first forecast step agree with the
/// recent five-year trend, in `[0.05, 1]`.
pub fn method_score(result: &EstimatorResult, series: &AnnualSeries) -> f64 {
    let Some(params) = result.params.as_ref() else {
        return DEFAULT_SCORE;
    };
    let Some(last) = series.last() else {
        return DEFAULT_SCORE;
    };
    if series.len() < 3 {
        return DEFAULT_SCORE;
    }

    let first_point = result.point(0);
    let mut score = match (params.r_squared(), first_point.and_then(|p| p.confidence)) {
        (Some(r2), _) => r2.max(0.1),
        (None, Some(c)) if c > 0.0 => c.max(0.1),
        _ => UNRATED_SCORE,
    };

    let recent = series.recent(5);
    let recent_change = match (recent.first(), recent.last()) {
        (Some(first), Some(last)) if recent.len() >= 2 => last.value - first.value,
        _ => 0.0,
    };
    let recent_direction = direction(recent_change, DIRECTION_THRESHOLD);

    if let Some(point) = first_point {
        let forecast_direction = direction(point.predicted - last.value, 0.0);

        if recent_direction != 0 && forecast_direction == recent_direction {
            let strength = (recent_change.abs() / FULL_STRENGTH_CHANGE).min(1.0);
            score *= 1.0 + MAX_DIRECTION_BONUS * strength;
        }

        if recent_direction != 0
            && forecast_direction == -recent_direction
            && recent_change.abs() > CONTRADICTION_CHANGE
        {
            score *= 0.5;
        }

        if let (Some(slope), Some(r2)) = (params.slope(), params.r_squared()) {
            if r2 > SLOPE_MIN_R_SQUARED
                && recent_direction != 0
                && direction(slope, 0.0) == recent_direction
            {
                score *= SLOPE_BONUS;
            }
        }
    }

    score.clamp(0.05, 1.0)
}
