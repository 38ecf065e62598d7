//! Trend analysis
//!
//! Fits an ordinary least-squares line through the (day-offset, daily
//! mean) pairs of the requested trailing window and reports direction,
//! rate of change, and a confidence score.
//!
//! The reference time is always caller-supplied; the analyzer never reads
//! the system clock, which keeps every result reproducible in tests.

use crate::catalog;
use crate::stats;
use crate::types::{DailyVitalsSummary, TrendAnalysis, TrendDirection, TrendPeriod, VitalType};
use chrono::NaiveDate;

/// Weight of data coverage in the confidence score
pub const COVERAGE_WEIGHT: f64 = 0.5;

/// Weight of fit quality (R-squared) in the confidence score
pub const FIT_WEIGHT: f64 = 0.5;

/// Analyze the trend of a vital over the trailing `period` ending at
/// `today`.
///
/// Records outside the window or tagged with a different vital are
/// ignored. Windows with fewer than two records produce the sentinel
/// analysis (stable, rate 0, confidence 0) rather than an error: the UI
/// must always have something to render.
pub fn analyze_trend(
    history: &[DailyVitalsSummary],
    vital: VitalType,
    period: TrendPeriod,
    today: NaiveDate,
) -> TrendAnalysis {
    let window_start = today - chrono::Duration::days(period.days() as i64 - 1);

    // (day offset from window start, daily mean)
    let points: Vec<(f64, f64)> = history
        .iter()
        .filter(|s| s.vital == vital && s.date >= window_start && s.date <= today)
        .map(|s| ((s.date - window_start).num_days() as f64, s.mean))
        .collect();

    let days_used = points.len();
    if days_used < 2 {
        return TrendAnalysis::sentinel(vital, period, days_used);
    }

    let fit = match stats::linear_fit(&points) {
        Ok(fit) => fit,
        // Degenerate window (e.g. duplicate offsets); same sentinel as
        // a too-small window
        Err(_) => return TrendAnalysis::sentinel(vital, period, days_used),
    };

    let direction = if fit.slope.abs() < catalog::noise_floor(vital) {
        TrendDirection::Stable
    } else if fit.slope > 0.0 {
        TrendDirection::Rising
    } else {
        TrendDirection::Falling
    };

    let coverage = days_used as f64 / period.days() as f64;
    let confidence =
        (COVERAGE_WEIGHT * coverage + FIT_WEIGHT * fit.r_squared).clamp(0.0, 1.0);

    TrendAnalysis {
        vital,
        period,
        direction,
        rate_per_day: fit.slope,
        confidence,
        days_used,
    }
}
