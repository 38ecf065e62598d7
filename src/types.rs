//! Core types for the vital trend engine
//!
//! This module defines the data structures that flow through the engine:
//! daily summaries in, reference ranges, trend analyses, and baseline
//! shifts out.

use crate::error::EngineError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed enumeration of supported vital signs.
///
/// Adding a variant is a compile-checked change: every catalog lookup
/// matches exhaustively on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalType {
    HeartRate,
    SystolicBp,
    DiastolicBp,
    Spo2,
    BodyWeight,
    BodyTemperature,
    RespiratoryRate,
}

impl VitalType {
    /// All supported vital types, in display order
    pub const ALL: [VitalType; 7] = [
        VitalType::HeartRate,
        VitalType::SystolicBp,
        VitalType::DiastolicBp,
        VitalType::Spo2,
        VitalType::BodyWeight,
        VitalType::BodyTemperature,
        VitalType::RespiratoryRate,
    ];

    /// Stable identifier used as a map key and on the FFI boundary
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalType::HeartRate => "heart_rate",
            VitalType::SystolicBp => "systolic_bp",
            VitalType::DiastolicBp => "diastolic_bp",
            VitalType::Spo2 => "spo2",
            VitalType::BodyWeight => "body_weight",
            VitalType::BodyTemperature => "body_temperature",
            VitalType::RespiratoryRate => "respiratory_rate",
        }
    }
}

impl FromStr for VitalType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heart_rate" => Ok(VitalType::HeartRate),
            "systolic_bp" => Ok(VitalType::SystolicBp),
            "diastolic_bp" => Ok(VitalType::DiastolicBp),
            "spo2" => Ok(VitalType::Spo2),
            "body_weight" => Ok(VitalType::BodyWeight),
            "body_temperature" => Ok(VitalType::BodyTemperature),
            "respiratory_rate" => Ok(VitalType::RespiratoryRate),
            other => Err(EngineError::UnknownVitalType(other.to_string())),
        }
    }
}

impl fmt::Display for VitalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sex used as a lookup key for generic clinical ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

/// Demographic lookup keys for generic clinical ranges.
///
/// Missing fields fall back to the adult band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    /// Age in whole years, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_years: Option<u32>,
    /// Sex, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
}

impl Demographics {
    /// Demographics for an adult of unspecified age and sex
    pub fn adult() -> Self {
        Self::default()
    }
}

/// One day's aggregated readings for one vital sign for one user.
///
/// The upstream aggregator (out of scope here) guarantees at most one
/// record per (user, vital, date). The engine only ever reads ordered,
/// duplicate-free slices of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyVitalsSummary {
    /// Calendar day, timezone-normalized upstream
    pub date: NaiveDate,
    /// Which vital this day summarizes
    pub vital: VitalType,
    /// Number of raw readings that day, always >= 1
    pub sample_count: u32,
    /// Lowest reading of the day
    pub min: f64,
    /// Highest reading of the day
    pub max: f64,
    /// Mean of the day's readings
    pub mean: f64,
    /// Day-level sample standard deviation. None when `sample_count == 1`:
    /// a single reading has no measured spread, and zero would falsely
    /// imply one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
}

impl DailyVitalsSummary {
    /// Summary for a day with exactly one reading
    pub fn single(date: NaiveDate, vital: VitalType, value: f64) -> Self {
        Self {
            date,
            vital,
            sample_count: 1,
            min: value,
            max: value,
            mean: value,
            std_dev: None,
        }
    }

    /// Summary for a day with multiple readings, validating the record
    /// invariants.
    pub fn aggregate(
        date: NaiveDate,
        vital: VitalType,
        sample_count: u32,
        min: f64,
        max: f64,
        mean: f64,
        std_dev: Option<f64>,
    ) -> Result<Self, EngineError> {
        if sample_count == 0 {
            return Err(EngineError::InvalidSummary(
                "sample_count must be >= 1".to_string(),
            ));
        }
        if !(min <= mean && mean <= max) {
            return Err(EngineError::InvalidSummary(format!(
                "min {min} <= mean {mean} <= max {max} violated"
            )));
        }
        if sample_count == 1 {
            if min != max {
                return Err(EngineError::InvalidSummary(
                    "single-sample day must have min == max == mean".to_string(),
                ));
            }
            if std_dev.is_some() {
                return Err(EngineError::InvalidSummary(
                    "single-sample day has no defined std_dev".to_string(),
                ));
            }
        }
        Ok(Self {
            date,
            vital,
            sample_count,
            min,
            max,
            mean,
            std_dev,
        })
    }
}

/// Supported trailing windows for a trend query.
///
/// Purely a query parameter, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendPeriod {
    Week,
    Month,
    Quarter,
    Year,
}

impl TrendPeriod {
    /// Number of trailing calendar days this period covers
    pub fn days(&self) -> usize {
        match self {
            TrendPeriod::Week => 7,
            TrendPeriod::Month => 30,
            TrendPeriod::Quarter => 90,
            TrendPeriod::Year => 365,
        }
    }

    /// Stable identifier used on the FFI/CLI boundary
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendPeriod::Week => "week",
            TrendPeriod::Month => "month",
            TrendPeriod::Quarter => "quarter",
            TrendPeriod::Year => "year",
        }
    }
}

impl FromStr for TrendPeriod {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" | "7d" => Ok(TrendPeriod::Week),
            "month" | "30d" => Ok(TrendPeriod::Month),
            "quarter" | "90d" => Ok(TrendPeriod::Quarter),
            "year" | "365d" => Ok(TrendPeriod::Year),
            other => Err(EngineError::InvalidPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for TrendPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a reference range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeSource {
    /// Population-level clinical norm from the catalog
    GenericClinical,
    /// Derived from this user's own recent history
    Personalized,
}

/// A (low, high) pair in the vital's canonical unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub low: f64,
    pub high: f64,
    pub source: RangeSource,
}

impl ReferenceRange {
    /// Build a range, enforcing `low <= high`
    pub fn new(low: f64, high: f64, source: RangeSource) -> Result<Self, EngineError> {
        if low > high {
            return Err(EngineError::InvalidRange { low, high });
        }
        Ok(Self { low, high, source })
    }

    /// Whether a value falls inside the range (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Width of the range in canonical units
    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// Direction of a computed trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Rising => write!(f, "rising"),
            TrendDirection::Falling => write!(f, "falling"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Computed trend for one (vital, period) query.
///
/// Created fresh on every query; the engine never caches these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    /// Which vital was analyzed
    pub vital: VitalType,
    /// The trailing window that was requested
    pub period: TrendPeriod,
    /// Rising, falling, or stable after the per-vital noise floor
    pub direction: TrendDirection,
    /// Estimated rate of change in canonical units per day
    pub rate_per_day: f64,
    /// Reliability score in [0, 1], from coverage and fit quality
    pub confidence: f64,
    /// Summaries actually used; may be far less than the period implies
    pub days_used: usize,
}

impl TrendAnalysis {
    /// Designed degenerate output for windows with fewer than two records.
    ///
    /// The UI must always have something to render, so a near-empty
    /// window is a sentinel, never an error.
    pub fn sentinel(vital: VitalType, period: TrendPeriod, days_used: usize) -> Self {
        Self {
            vital,
            period,
            direction: TrendDirection::Stable,
            rate_per_day: 0.0,
            confidence: 0.0,
            days_used,
        }
    }
}

/// Mean and spread of one sub-window used in shift detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineWindow {
    /// Mean of the daily means in the sub-window
    pub mean: f64,
    /// Sample standard deviation of the daily means
    pub std_dev: f64,
    /// Qualifying days in the sub-window
    pub days: usize,
}

/// A sustained deviation from the user's established baseline.
///
/// Emitted only when all detection criteria hold; the absence of a shift
/// is the common outcome and is modeled as `None`, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineShift {
    /// Which vital shifted
    pub vital: VitalType,
    /// First day of the candidate window: when the shift is judged to
    /// have started
    pub transition_date: NaiveDate,
    /// The established baseline before the shift
    pub prior: BaselineWindow,
    /// The new baseline after the shift
    pub candidate: BaselineWindow,
    /// Separation of the two means in pooled standard deviations
    pub magnitude_sigma: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_vital_type_round_trip_ids() {
        for vital in VitalType::ALL {
            let parsed: VitalType = vital.as_str().parse().unwrap();
            assert_eq!(parsed, vital);
        }
    }

    #[test]
    fn test_unknown_vital_type_fails_fast() {
        let err = "blood_glucose".parse::<VitalType>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownVitalType(_)));
    }

    #[test]
    fn test_period_days() {
        assert_eq!(TrendPeriod::Week.days(), 7);
        assert_eq!(TrendPeriod::Month.days(), 30);
        assert_eq!(TrendPeriod::Quarter.days(), 90);
        assert_eq!(TrendPeriod::Year.days(), 365);
    }

    #[test]
    fn test_malformed_period_fails_fast() {
        let err = "14d".parse::<TrendPeriod>().unwrap_err();
        assert!(matches!(err, EngineError::InvalidPeriod(_)));
    }

    #[test]
    fn test_single_sample_summary_has_no_std_dev() {
        let summary = DailyVitalsSummary::single(day(1), VitalType::HeartRate, 72.0);
        assert_eq!(summary.sample_count, 1);
        assert_eq!(summary.min, 72.0);
        assert_eq!(summary.max, 72.0);
        assert_eq!(summary.mean, 72.0);
        assert_eq!(summary.std_dev, None);
    }

    #[test]
    fn test_aggregate_rejects_zero_samples() {
        let err = DailyVitalsSummary::aggregate(
            day(1),
            VitalType::HeartRate,
            0,
            60.0,
            80.0,
            70.0,
            Some(5.0),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSummary(_)));
    }

    #[test]
    fn test_aggregate_rejects_std_dev_on_single_sample() {
        let err = DailyVitalsSummary::aggregate(
            day(1),
            VitalType::HeartRate,
            1,
            72.0,
            72.0,
            72.0,
            Some(0.0),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSummary(_)));
    }

    #[test]
    fn test_aggregate_rejects_unordered_bounds() {
        let err = DailyVitalsSummary::aggregate(
            day(1),
            VitalType::HeartRate,
            3,
            80.0,
            60.0,
            70.0,
            Some(5.0),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSummary(_)));
    }

    #[test]
    fn test_reference_range_orders_bounds() {
        let range = ReferenceRange::new(60.0, 100.0, RangeSource::GenericClinical).unwrap();
        assert!(range.contains(72.0));
        assert!(!range.contains(110.0));
        assert_eq!(range.width(), 40.0);

        let err = ReferenceRange::new(100.0, 60.0, RangeSource::GenericClinical).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange { .. }));
    }

    #[test]
    fn test_summary_serde_round_trip() {
        let summary = DailyVitalsSummary::aggregate(
            day(15),
            VitalType::Spo2,
            4,
            95.0,
            99.0,
            97.0,
            Some(1.6),
        )
        .unwrap();

        let json = serde_json::to_string(&summary).unwrap();
        let back: DailyVitalsSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn test_sentinel_analysis() {
        let sentinel = TrendAnalysis::sentinel(VitalType::HeartRate, TrendPeriod::Week, 1);
        assert_eq!(sentinel.direction, TrendDirection::Stable);
        assert_eq!(sentinel.rate_per_day, 0.0);
        assert_eq!(sentinel.confidence, 0.0);
        assert_eq!(sentinel.days_used, 1);
    }
}
