//! Vital Trend - On-device analysis engine for vital-sign histories
//!
//! The engine ingests per-day aggregated vital summaries and answers three
//! questions about a single user's longitudinal data:
//!
//! - **Trend**: direction, rate of change, and confidence over a selected
//!   trailing period (least-squares fit over daily means)
//! - **Reference ranges**: generic clinical norms from the catalog, and
//!   personalized ranges derived from the user's own recent history
//! - **Baseline shifts**: sustained deviations from the user's established
//!   baseline, distinguished from day-to-day noise by a two-window
//!   change-point comparison
//!
//! Every operation is a pure function of its inputs: no clocks, no I/O,
//! no shared state. Callers supply the reference day and an immutable
//! history slice, which makes results reproducible and concurrent calls
//! inherently safe.

pub mod catalog;
pub mod error;
pub mod range;
pub mod report;
pub mod shift;
pub mod stats;
pub mod trend;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use error::EngineError;
pub use range::{personalized_range, reference_range};
pub use report::{TrendReportEncoder, VitalTrendReport};
pub use shift::detect_baseline_shift;
pub use trend::analyze_trend;
pub use types::{
    BaselineShift, BaselineWindow, DailyVitalsSummary, Demographics, RangeSource, ReferenceRange,
    Sex, TrendAnalysis, TrendDirection, TrendPeriod, VitalType,
};

/// Engine version embedded in all report payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "vital-trend";
