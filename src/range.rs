//! Reference range provider
//!
//! Resolves the two flavors of reference range for a vital:
//! - generic clinical norms, delegated to the catalog
//! - personalized ranges derived from the user's own recent history
//!
//! The provider is stateless: personalized ranges are recomputed from the
//! supplied history slice on every call, which keeps concurrent reads
//! trivially safe.

use crate::catalog;
use crate::error::EngineError;
use crate::stats;
use crate::types::{DailyVitalsSummary, Demographics, RangeSource, ReferenceRange, VitalType};

/// Multiplier on the history's standard deviation for personalized range
/// width: mean +/- 2 sigma covers ~95% of a user's days under a normal
/// approximation.
pub const PERSONALIZED_RANGE_SIGMA: f64 = 2.0;

/// Trailing lookback over which the personalized range is derived
pub const PERSONALIZED_LOOKBACK_DAYS: i64 = 60;

/// Minimum qualifying days before a personalized range is emitted.
/// Below this, callers fall back to the generic range.
pub const MIN_QUALIFYING_DAYS: usize = 14;

/// Generic clinical range for a vital, age-banded by demographics
pub fn reference_range(vital: VitalType, demographics: &Demographics) -> ReferenceRange {
    catalog::generic_range(vital, demographics)
}

/// Personalized range from the user's own recent history.
///
/// Uses the daily means of qualifying days (matching vital) within the
/// trailing lookback, anchored at the newest record in the slice. With
/// fewer than `MIN_QUALIFYING_DAYS` qualifying days this fails with
/// `NotEnoughHistory`; callers must treat that as "use the generic
/// range", never as a zero-width range.
pub fn personalized_range(
    history: &[DailyVitalsSummary],
    vital: VitalType,
) -> Result<ReferenceRange, EngineError> {
    let newest = history
        .iter()
        .filter(|s| s.vital == vital)
        .map(|s| s.date)
        .max()
        .ok_or(EngineError::NotEnoughHistory {
            required: MIN_QUALIFYING_DAYS,
            available: 0,
        })?;

    let cutoff = newest - chrono::Duration::days(PERSONALIZED_LOOKBACK_DAYS - 1);
    let daily_means: Vec<f64> = history
        .iter()
        .filter(|s| s.vital == vital && s.date >= cutoff)
        .map(|s| s.mean)
        .collect();

    if daily_means.len() < MIN_QUALIFYING_DAYS {
        return Err(EngineError::NotEnoughHistory {
            required: MIN_QUALIFYING_DAYS,
            available: daily_means.len(),
        });
    }

    let center = stats::mean(&daily_means)?;
    let spread = stats::std_dev(&daily_means)?;

    ReferenceRange::new(
        center - PERSONALIZED_RANGE_SIGMA * spread,
        center + PERSONALIZED_RANGE_SIGMA * spread,
        RangeSource::Personalized,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn make_history(vital: VitalType, means: &[f64]) -> Vec<DailyVitalsSummary> {
        means
            .iter()
            .enumerate()
            .map(|(i, &m)| DailyVitalsSummary::single(day(i as i64), vital, m))
            .collect()
    }

    #[test]
    fn test_personalized_range_centered_on_history() {
        // 20 qualifying days alternating 68/72: mean 70
        let means: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 68.0 } else { 72.0 }).collect();
        let history = make_history(VitalType::HeartRate, &means);

        let range = personalized_range(&history, VitalType::HeartRate).unwrap();
        assert_eq!(range.source, RangeSource::Personalized);
        assert!(range.low < 70.0 && 70.0 < range.high);
        // Symmetric around the mean
        assert!(((70.0 - range.low) - (range.high - 70.0)).abs() < 1e-9);
        assert!(range.low <= range.high);
    }

    #[test]
    fn test_personalized_range_requires_minimum_days() {
        let means: Vec<f64> = (0..10).map(|i| 70.0 + i as f64 * 0.1).collect();
        let history = make_history(VitalType::HeartRate, &means);

        let err = personalized_range(&history, VitalType::HeartRate).unwrap_err();
        match err {
            EngineError::NotEnoughHistory { required, available } => {
                assert_eq!(required, MIN_QUALIFYING_DAYS);
                assert_eq!(available, 10);
            }
            other => panic!("expected NotEnoughHistory, got {other:?}"),
        }
    }

    #[test]
    fn test_personalized_range_ignores_other_vitals() {
        // Plenty of SpO2 days, but only 5 heart-rate days
        let mut history = make_history(VitalType::Spo2, &[97.0; 30]);
        history.extend(make_history(VitalType::HeartRate, &[70.0; 5]));

        let err = personalized_range(&history, VitalType::HeartRate).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NotEnoughHistory { available: 5, .. }
        ));
    }

    #[test]
    fn test_personalized_range_limited_to_lookback() {
        // 90 days of drift; only the trailing 60 should shape the range
        let means: Vec<f64> = (0..90).map(|i| i as f64).collect();
        let history = make_history(VitalType::BodyWeight, &means);

        let range = personalized_range(&history, VitalType::BodyWeight).unwrap();
        // Trailing 60 days are means 30..=89, centered at 59.5
        let center = (range.low + range.high) / 2.0;
        assert!((center - 59.5).abs() < 1e-9);
    }

    #[test]
    fn test_generic_fallback_scenario() {
        // End-to-end fallback: 10 days of heart rate is below the minimum,
        // so the caller uses the generic adult range instead.
        let history = make_history(VitalType::HeartRate, &[72.0; 10]);

        let personalized = personalized_range(&history, VitalType::HeartRate);
        assert!(personalized.is_err());

        let fallback = reference_range(VitalType::HeartRate, &Demographics::adult());
        assert_eq!(fallback.low, 60.0);
        assert_eq!(fallback.high, 100.0);
        assert_eq!(fallback.source, RangeSource::GenericClinical);
    }

    #[test]
    fn test_empty_history_is_not_enough() {
        let err = personalized_range(&[], VitalType::HeartRate).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NotEnoughHistory { available: 0, .. }
        ));
    }
}
