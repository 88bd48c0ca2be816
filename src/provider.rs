//! Historical series keys and the data-access seam.
//!
//! Fetching SAHIE data is the host application's job. The pipeline only sees
//! a [`SeriesProvider`], which can be a closure, an [`InMemoryProvider`], or
//! any type wrapping a real client.

use crate::core::Observation;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// First year of published SAHIE estimates.
pub const HISTORY_START: i32 = 2006;
/// Latest year of published SAHIE estimates.
pub const HISTORY_END: i32 = 2022;

/// Level of a FIPS code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geography {
    State,
    County,
}

/// SAHIE demographic category codes. `0` means "all" for every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Demographics {
    pub age: u8,
    pub sex: u8,
    /// Income-to-poverty ratio category.
    pub income: u8,
    /// Race category; published for states only.
    pub race: u8,
}

impl Demographics {
    pub fn with_age(mut self, age: u8) -> Self {
        self.age = age;
        self
    }

    pub fn with_sex(mut self, sex: u8) -> Self {
        self.sex = sex;
        self
    }

    pub fn with_income(mut self, income: u8) -> Self {
        self.income = income;
        self
    }

    pub fn with_race(mut self, race: u8) -> Self {
        self.race = race;
        self
    }
}

/// Geography plus demographic slice identifying one historical series.
///
/// # Example
///
/// ```
/// use coverage_forecast::provider::{Demographics, Geography, SeriesKey};
///
/// let key = SeriesKey::new("06037", Demographics::default()).unwrap();
/// assert_eq!(key.geography(), Geography::County);
/// assert_eq!(key.state_fips(), "06");
///
/// // Race slices exist only for states.
/// assert!(SeriesKey::new("06037", Demographics::default().with_race(1)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSeriesKey")]
pub struct SeriesKey {
    fips: String,
    demographics: Demographics,
}

#[derive(Deserialize)]
struct RawSeriesKey {
    fips: String,
    #[serde(default)]
    demographics: Demographics,
}

impl TryFrom<RawSeriesKey> for SeriesKey {
    type Error = ForecastError;

    fn try_from(raw: RawSeriesKey) -> Result<Self> {
        Self::new(raw.fips, raw.demographics)
    }
}

impl SeriesKey {
    /// Validate and build a key.
    ///
    /// # Errors
    /// [`ForecastError::InvalidSeriesKey`] when the FIPS code is not 2 or 5
    /// digits, or a county key carries a race category.
    pub fn new(fips: impl Into<String>, demographics: Demographics) -> Result<Self> {
        let fips = fips.into();
        if !fips.bytes().all(|b| b.is_ascii_digit()) || !matches!(fips.len(), 2 | 5) {
            return Err(ForecastError::InvalidSeriesKey(format!(
                "fips must be 2 or 5 digits, got {fips:?}"
            )));
        }
        if fips.len() == 5 && demographics.race != 0 {
            return Err(ForecastError::InvalidSeriesKey(format!(
                "race category {} is only published for states, got county {fips}",
                demographics.race
            )));
        }
        Ok(Self { fips, demographics })
    }

    /// State-level key for all demographics.
    pub fn state(fips: impl Into<String>) -> Result<Self> {
        Self::new(fips, Demographics::default())
    }

    pub fn fips(&self) -> &str {
        &self.fips
    }

    pub fn demographics(&self) -> Demographics {
        self.demographics
    }

    pub fn geography(&self) -> Geography {
        if self.fips.len() == 2 {
            Geography::State
        } else {
            Geography::County
        }
    }

    /// The two-digit state part of the code.
    pub fn state_fips(&self) -> &str {
        &self.fips[..2]
    }

    /// SAHIE query parameters for this slice, for hosts that fetch from the
    /// Census API.
    pub fn query_parameters(&self) -> Vec<(&'static str, String)> {
        let d = self.demographics;
        let mut params = vec![
            ("AGECAT", d.age.to_string()),
            ("SEXCAT", d.sex.to_string()),
            ("IPRCAT", d.income.to_string()),
        ];
        if self.geography() == Geography::State && d.race != 0 {
            params.push(("RACECAT", d.race.to_string()));
        }
        params
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.demographics;
        write!(
            f,
            "{} (age {}, sex {}, income {}, race {})",
            self.fips, d.age, d.sex, d.income, d.race
        )
    }
}

/// Source of historical observations.
///
/// Implemented for closures, so tests and hosts can pass a function:
///
/// ```
/// use coverage_forecast::core::Observation;
/// use coverage_forecast::provider::{SeriesKey, SeriesProvider};
/// use coverage_forecast::Result;
///
/// let provider =
///     |_: &SeriesKey| -> Result<Vec<Observation>> { Ok(vec![Observation::new(2022, 91.5)]) };
/// let key = SeriesKey::state("06").unwrap();
/// assert_eq!(provider.fetch(&key).unwrap().len(), 1);
/// ```
pub trait SeriesProvider: Send + Sync {
    /// Observations for `key`, in any order.
    ///
    /// # Errors
    /// * [`ForecastError::SeriesNotFound`] when nothing is published for the key
    /// * [`ForecastError::Provider`] when the underlying source fails
    fn fetch(&self, key: &SeriesKey) -> Result<Vec<Observation>>;
}

impl<F> SeriesProvider for F
where
    F: Fn(&SeriesKey) -> Result<Vec<Observation>> + Send + Sync,
{
    fn fetch(&self, key: &SeriesKey) -> Result<Vec<Observation>> {
        self(key)
    }
}

/// Provider over series held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<SeriesKey, Vec<Observation>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, key: SeriesKey, observations: Vec<Observation>) -> Self {
        self.insert(key, observations);
        self
    }

    /// Store `observations` for `key`, replacing any earlier series.
    pub fn insert(&mut self, key: SeriesKey, observations: Vec<Observation>) {
        self.series.insert(key, observations);
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl SeriesProvider for InMemoryProvider {
    fn fetch(&self, key: &SeriesKey) -> Result<Vec<Observation>> {
        match self.series.get(key) {
            Some(observations) if !observations.is_empty() => Ok(observations.clone()),
            _ => Err(ForecastError::SeriesNotFound(key.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fips_validation() {
        assert_eq!(SeriesKey::state("06").unwrap().geography(), Geography::State);
        assert!(matches!(
            SeriesKey::state("6"),
            Err(ForecastError::InvalidSeriesKey(_))
        ));
        assert!(SeriesKey::state("0603").is_err());
        assert!(SeriesKey::state("CA").is_err());
        assert!(SeriesKey::state("06a37").is_err());
    }

    #[test]
    fn test_race_only_for_states() {
        let race = Demographics::default().with_race(2);
        assert!(SeriesKey::new("48", race).is_ok());
        assert!(matches!(
            SeriesKey::new("48201", race),
            Err(ForecastError::InvalidSeriesKey(_))
        ));
    }

    #[test]
    fn test_query_parameters() {
        let demographics = Demographics::default().with_age(1).with_income(3).with_race(2);
        let state = SeriesKey::new("48", demographics).unwrap();
        assert_eq!(
            state.query_parameters(),
            vec![
                ("AGECAT", "1".to_string()),
                ("SEXCAT", "0".to_string()),
                ("IPRCAT", "3".to_string()),
                ("RACECAT", "2".to_string()),
            ]
        );

        let county = SeriesKey::new("48201", demographics.with_race(0)).unwrap();
        assert_eq!(county.query_parameters().len(), 3);
        assert_eq!(county.state_fips(), "48");
    }

    #[test]
    fn test_display() {
        let key = SeriesKey::new("06037", Demographics::default().with_sex(2)).unwrap();
        assert_eq!(key.to_string(), "06037 (age 0, sex 2, income 0, race 0)");
    }

    #[test]
    fn test_in_memory_provider() {
        let key = SeriesKey::state("06").unwrap();
        let other = SeriesKey::state("41").unwrap();
        let provider = InMemoryProvider::new()
            .with_series(key.clone(), vec![Observation::new(2021, 90.0)])
            .with_series(other.clone(), Vec::new());

        assert_eq!(provider.len(), 2);
        assert_eq!(provider.fetch(&key).unwrap(), vec![Observation::new(2021, 90.0)]);
        assert_eq!(
            provider.fetch(&other),
            Err(ForecastError::SeriesNotFound(other.to_string()))
        );
    }

    #[test]
    fn test_closure_provider_errors_propagate() {
        let provider = |_: &SeriesKey| -> Result<Vec<Observation>> {
            Err(ForecastError::Provider("timeout".into()))
        };
        let key = SeriesKey::state("06").unwrap();
        assert_eq!(
            provider.fetch(&key),
            Err(ForecastError::Provider("timeout".to_string()))
        );
    }

    #[test]
    fn test_key_deserialization_validates() {
        let key: SeriesKey =
            serde_json::from_str(r#"{"fips":"06","demographics":{"age":1}}"#).unwrap();
        assert_eq!(key.demographics().age, 1);
        assert!(serde_json::from_str::<SeriesKey>(r#"{"fips":"123"}"#).is_err());
    }
}
