//! Baseline shift detection
//!
//! Distinguishes a real, sustained change in a user's normal state (a new
//! resting heart-rate plateau after a medication change, say) from the
//! day-to-day noise a naive out-of-range check would over-flag.
//!
//! Change-point style, two-window comparison: the trailing lookback is
//! split into an older reference window and a newer candidate window, and
//! a shift is declared only when the windows are well populated, their
//! means are separated by a pooled-sigma threshold, and the candidate days
//! sit consistently on the new side of the midpoint.

use crate::range::MIN_QUALIFYING_DAYS;
use crate::stats;
use crate::types::{BaselineShift, BaselineWindow, DailyVitalsSummary, VitalType};
use chrono::NaiveDate;

/// Total trailing lookback considered for shift detection
pub const SHIFT_LOOKBACK_DAYS: i64 = 30;

/// Span of the newer candidate sub-window (the remainder of the lookback
/// forms the reference sub-window)
pub const CANDIDATE_WINDOW_DAYS: i64 = 10;

/// Minimum separation of the two means, in pooled standard deviations
pub const SHIFT_SIGMA_THRESHOLD: f64 = 1.5;

/// Fraction of candidate days that must lie on the candidate side of the
/// midpoint between the two means. Guards against a single outlier day
/// dragging the candidate mean.
pub const SHIFT_CONSISTENCY_FRACTION: f64 = 0.8;

/// Minimum qualifying days in the candidate sub-window. The reference
/// sub-window reuses `MIN_QUALIFYING_DAYS`; the 10-day candidate window
/// cannot hold that many, so it carries its own floor.
pub const MIN_CANDIDATE_DAYS: usize = 7;

/// Detect a sustained baseline shift for `vital` in the trailing lookback
/// ending at `today`.
///
/// `None` is the common, non-error outcome; callers must not log it as a
/// failure. Identical inputs always yield identical output.
pub fn detect_baseline_shift(
    history: &[DailyVitalsSummary],
    vital: VitalType,
    today: NaiveDate,
) -> Option<BaselineShift> {
    let lookback_start = today - chrono::Duration::days(SHIFT_LOOKBACK_DAYS - 1);
    let candidate_start = today - chrono::Duration::days(CANDIDATE_WINDOW_DAYS - 1);

    let mut reference_means = Vec::new();
    let mut candidate_means = Vec::new();
    let mut transition_date: Option<NaiveDate> = None;

    for summary in history {
        if summary.vital != vital || summary.date < lookback_start || summary.date > today {
            continue;
        }
        if summary.date >= candidate_start {
            candidate_means.push(summary.mean);
            transition_date = Some(match transition_date {
                Some(d) if d <= summary.date => d,
                _ => summary.date,
            });
        } else {
            reference_means.push(summary.mean);
        }
    }

    // Criterion 1: both sub-windows well populated
    if reference_means.len() < MIN_QUALIFYING_DAYS || candidate_means.len() < MIN_CANDIDATE_DAYS {
        return None;
    }

    // Window sizes are checked above, so these cannot fail
    let reference_mean = stats::mean(&reference_means).ok()?;
    let reference_sd = stats::std_dev(&reference_means).ok()?;
    let candidate_mean = stats::mean(&candidate_means).ok()?;
    let candidate_sd = stats::std_dev(&candidate_means).ok()?;

    let pooled = stats::pooled_std_dev(
        reference_sd,
        reference_means.len(),
        candidate_sd,
        candidate_means.len(),
    );
    if pooled <= 0.0 {
        // No spread estimate: a separation in sigma units is undefined
        return None;
    }

    // Criterion 2: separation beyond the sigma threshold
    let separation = candidate_mean - reference_mean;
    let magnitude_sigma = separation.abs() / pooled;
    if magnitude_sigma < SHIFT_SIGMA_THRESHOLD {
        return None;
    }

    // Criterion 3: candidate days consistently on the new side
    let midpoint = (reference_mean + candidate_mean) / 2.0;
    let on_new_side = candidate_means
        .iter()
        .filter(|&&m| {
            if separation > 0.0 {
                m > midpoint
            } else {
                m < midpoint
            }
        })
        .count();
    let consistency = on_new_side as f64 / candidate_means.len() as f64;
    if consistency < SHIFT_CONSISTENCY_FRACTION {
        return None;
    }

    Some(BaselineShift {
        vital,
        // Candidate days exist, so the earliest candidate date is set
        transition_date: transition_date?,
        prior: BaselineWindow {
            mean: reference_mean,
            std_dev: reference_sd,
            days: reference_means.len(),
        },
        candidate: BaselineWindow {
            mean: candidate_mean,
            std_dev: candidate_sd,
            days: candidate_means.len(),
        },
        magnitude_sigma,
    })
}
