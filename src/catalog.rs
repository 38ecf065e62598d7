//! Vital catalog
//!
//! Static per-vital metadata: display names, chart color tokens, units,
//! display formatting, generic clinical reference ranges, and the per-vital
//! trend noise floor. Everything here is an exhaustive match on the closed
//! `VitalType` enum, so adding a vital is a compile-checked change.
//!
//! All lookups are side-effect free and safe from any thread.

use crate::types::{Demographics, RangeSource, ReferenceRange, VitalType};

/// Human-readable name for chart headers
pub fn display_name(vital: VitalType) -> &'static str {
    match vital {
        VitalType::HeartRate => "Heart Rate",
        VitalType::SystolicBp => "Systolic Blood Pressure",
        VitalType::DiastolicBp => "Diastolic Blood Pressure",
        VitalType::Spo2 => "Oxygen Saturation",
        VitalType::BodyWeight => "Body Weight",
        VitalType::BodyTemperature => "Body Temperature",
        VitalType::RespiratoryRate => "Respiratory Rate",
    }
}

/// Short clinical abbreviation
pub fn abbreviation(vital: VitalType) -> &'static str {
    match vital {
        VitalType::HeartRate => "HR",
        VitalType::SystolicBp => "SBP",
        VitalType::DiastolicBp => "DBP",
        VitalType::Spo2 => "SpO2",
        VitalType::BodyWeight => "Wt",
        VitalType::BodyTemperature => "Temp",
        VitalType::RespiratoryRate => "RR",
    }
}

/// Canonical unit for the vital's values
pub fn unit(vital: VitalType) -> &'static str {
    match vital {
        VitalType::HeartRate => "bpm",
        VitalType::SystolicBp | VitalType::DiastolicBp => "mmHg",
        VitalType::Spo2 => "%",
        VitalType::BodyWeight => "kg",
        VitalType::BodyTemperature => "\u{b0}C",
        VitalType::RespiratoryRate => "breaths/min",
    }
}

/// Decimal places for display formatting
pub fn decimals(vital: VitalType) -> usize {
    match vital {
        VitalType::HeartRate
        | VitalType::SystolicBp
        | VitalType::DiastolicBp
        | VitalType::Spo2
        | VitalType::RespiratoryRate => 0,
        VitalType::BodyWeight | VitalType::BodyTemperature => 1,
    }
}

/// Stable color token for the chart palette.
///
/// The view resolves tokens to actual colors; the engine only guarantees
/// the token is stable per vital.
pub fn color_token(vital: VitalType) -> &'static str {
    match vital {
        VitalType::HeartRate => "vital.red",
        VitalType::SystolicBp => "vital.indigo",
        VitalType::DiastolicBp => "vital.blue",
        VitalType::Spo2 => "vital.teal",
        VitalType::BodyWeight => "vital.amber",
        VitalType::BodyTemperature => "vital.orange",
        VitalType::RespiratoryRate => "vital.green",
    }
}

/// Format a value with the vital's decimal places and unit.
///
/// NaN and infinities render as the placeholder; sparse upstream data can
/// legitimately produce undefined aggregates and formatting must not
/// panic on them.
pub fn format_value(vital: VitalType, value: f64) -> String {
    if !value.is_finite() {
        return "\u{2014}".to_string();
    }
    format!("{:.*} {}", decimals(vital), value, unit(vital))
}

/// Noise floor for trend direction in canonical units per day.
///
/// Slopes with magnitude below the floor count as stable. Tunable design
/// values, scaled to each vital's day-to-day variability.
pub fn noise_floor(vital: VitalType) -> f64 {
    match vital {
        VitalType::HeartRate => 0.15,
        VitalType::SystolicBp => 0.20,
        VitalType::DiastolicBp => 0.15,
        VitalType::Spo2 => 0.05,
        VitalType::BodyWeight => 0.03,
        VitalType::BodyTemperature => 0.02,
        VitalType::RespiratoryRate => 0.10,
    }
}

/// Generic clinical reference range for a vital, age-banded where clinical
/// norms distinguish bands. Missing demographics fall back to the adult
/// band.
///
/// Body weight has no population-level clinical range; the returned band
/// is a coarse adult plausibility envelope, not a clinical norm.
pub fn generic_range(vital: VitalType, demographics: &Demographics) -> ReferenceRange {
    let (low, high) = match vital {
        VitalType::HeartRate => match demographics.age_years {
            Some(age) if age < 1 => (100.0, 160.0),
            Some(age) if age <= 10 => (70.0, 130.0),
            _ => (60.0, 100.0),
        },
        VitalType::SystolicBp => match demographics.age_years {
            Some(age) if (1..=12).contains(&age) => (80.0, 110.0),
            Some(age) if age >= 65 => (90.0, 140.0),
            _ => (90.0, 120.0),
        },
        VitalType::DiastolicBp => (60.0, 80.0),
        VitalType::Spo2 => match demographics.age_years {
            Some(0) => (91.0, 95.0),
            _ => (95.0, 100.0),
        },
        // Coarse plausibility band; see doc comment
        VitalType::BodyWeight => (45.0, 120.0),
        VitalType::BodyTemperature => (36.1, 37.2),
        VitalType::RespiratoryRate => match demographics.age_years {
            Some(age) if age < 1 => (30.0, 60.0),
            Some(age) if age <= 2 => (24.0, 30.0),
            Some(age) if age <= 12 => (18.0, 24.0),
            Some(age) if age >= 65 => (12.0, 22.0),
            _ => (12.0, 20.0),
        },
    };

    // Static tables keep the invariant by construction
    ReferenceRange {
        low,
        high,
        source: RangeSource::GenericClinical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_applies_decimals_and_unit() {
        assert_eq!(format_value(VitalType::HeartRate, 71.6), "72 bpm");
        assert_eq!(format_value(VitalType::BodyWeight, 70.25), "70.2 kg");
        assert_eq!(format_value(VitalType::BodyTemperature, 36.62), "36.6 \u{b0}C");
        assert_eq!(format_value(VitalType::Spo2, 97.4), "97 %");
    }

    #[test]
    fn test_format_renders_placeholder_for_non_finite() {
        assert_eq!(format_value(VitalType::HeartRate, f64::NAN), "\u{2014}");
        assert_eq!(format_value(VitalType::Spo2, f64::INFINITY), "\u{2014}");
        assert_eq!(
            format_value(VitalType::BodyWeight, f64::NEG_INFINITY),
            "\u{2014}"
        );
    }

    #[test]
    fn test_adult_heart_rate_range() {
        let range = generic_range(VitalType::HeartRate, &Demographics::adult());
        assert_eq!(range.low, 60.0);
        assert_eq!(range.high, 100.0);
        assert_eq!(range.source, RangeSource::GenericClinical);
    }

    #[test]
    fn test_age_banded_ranges() {
        let newborn = Demographics {
            age_years: Some(0),
            sex: None,
        };
        let child = Demographics {
            age_years: Some(6),
            sex: None,
        };

        let hr_newborn = generic_range(VitalType::HeartRate, &newborn);
        assert_eq!((hr_newborn.low, hr_newborn.high), (100.0, 160.0));

        let hr_child = generic_range(VitalType::HeartRate, &child);
        assert_eq!((hr_child.low, hr_child.high), (70.0, 130.0));

        let rr_child = generic_range(VitalType::RespiratoryRate, &child);
        assert_eq!((rr_child.low, rr_child.high), (18.0, 24.0));
    }

    #[test]
    fn test_all_generic_ranges_are_ordered() {
        let bands = [
            Demographics::adult(),
            Demographics {
                age_years: Some(0),
                sex: None,
            },
            Demographics {
                age_years: Some(6),
                sex: None,
            },
            Demographics {
                age_years: Some(70),
                sex: None,
            },
        ];
        for vital in VitalType::ALL {
            for demographics in &bands {
                let range = generic_range(vital, demographics);
                assert!(range.low <= range.high, "{vital}: {range:?}");
            }
        }
    }

    #[test]
    fn test_metadata_defined_for_all_vitals() {
        for vital in VitalType::ALL {
            assert!(!display_name(vital).is_empty());
            assert!(!abbreviation(vital).is_empty());
            assert!(!unit(vital).is_empty());
            assert!(!color_token(vital).is_empty());
            assert!(noise_floor(vital) > 0.0);
        }
    }
}
