//! Error types for the vital trend engine

use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Debug, Error)]
pub enum EngineError {
    /// A vital-type identifier that is not part of the closed catalog.
    /// Indicates a caller bug, never a data condition.
    #[error("Unknown vital type: {0}")]
    UnknownVitalType(String),

    /// A trend-period identifier that does not name a supported window.
    #[error("Invalid trend period: {0}")]
    InvalidPeriod(String),

    /// Not enough samples for the requested statistic. Expected and
    /// frequent; callers must handle it rather than assume a value.
    #[error("Insufficient data: {0}")]
    InsufficientData(&'static str),

    /// Too few qualifying days to derive a personalized range. Callers
    /// fall back to the generic clinical range.
    #[error("Not enough history: {available} qualifying days, {required} required")]
    NotEnoughHistory { required: usize, available: usize },

    /// A daily summary that violates its own invariants
    /// (e.g. `sample_count == 0`, or min > mean).
    #[error("Invalid daily summary: {0}")]
    InvalidSummary(String),

    /// A reference range where low > high.
    #[error("Invalid reference range: low {low} > high {high}")]
    InvalidRange { low: f64, high: f64 },

    /// Date string that does not parse as a calendar day (boundary only).
    #[error("Date parse error: {0}")]
    DateParseError(String),

    /// JSON error at the FFI/CLI boundary.
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
