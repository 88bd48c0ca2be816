//! Error types for the coverage-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while building series or producing forecasts.
///
/// Individual estimators never return these for short input; they fail soft
/// with an empty result instead. Errors are reserved for invalid input and for
/// the ensemble-level minimum history.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for a single estimator.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Not enough history for the ensemble to produce a meaningful forecast.
    #[error("insufficient history: need at least {needed} observations, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    /// Observation value is non-finite or outside the percentage domain.
    #[error("invalid observation for {year}: {value} is not a percentage in [0, 100]")]
    InvalidObservation { year: i32, value: f64 },

    /// Two observations share the same year.
    #[error("duplicate observation for year {0}")]
    DuplicateYear(i32),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Normal equations have no unique solution.
    #[error("singular linear system: pivot {pivot:e} in column {column}")]
    SingularSystem { column: usize, pivot: f64 },

    /// Malformed geography/demographic key.
    #[error("invalid series key: {0}")]
    InvalidSeriesKey(String),

    /// The provider holds no observations for the key.
    #[error("no historical series for {0}")]
    SeriesNotFound(String),

    /// The injected data provider failed.
    #[error("series provider failed: {0}")]
    Provider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = ForecastError::InsufficientData { needed: 4, got: 3 };
        assert_eq!(err.to_string(), "insufficient data: need at least 4, got 3");

        let err = ForecastError::InsufficientHistory { needed: 3, got: 2 };
        assert_eq!(
            err.to_string(),
            "insufficient history: need at least 3 observations, got 2"
        );

        let err = ForecastError::InvalidObservation {
            year: 2020,
            value: 104.5,
        };
        assert_eq!(
            err.to_string(),
            "invalid observation for 2020: 104.5 is not a percentage in [0, 100]"
        );

        let err = ForecastError::DuplicateYear(2019);
        assert_eq!(err.to_string(), "duplicate observation for year 2019");

        let err = ForecastError::DimensionMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 2");

        let err = ForecastError::InvalidSeriesKey("fips must be 2 or 5 digits".to_string());
        assert_eq!(
            err.to_string(),
            "invalid series key: fips must be 2 or 5 digits"
        );
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::SeriesNotFound("06".to_string());
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
