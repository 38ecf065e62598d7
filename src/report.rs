//! Report encoding
//!
//! Bundles the engine's outputs for one (vital, period) query into a
//! single serializable payload the `VitalTrend` chart component consumes.
//! The report carries producer and computation metadata so a rendered
//! chart can always be traced back to the engine build that produced it.

use crate::error::EngineError;
use crate::range;
use crate::shift;
use crate::trend;
use crate::types::{
    BaselineShift, DailyVitalsSummary, Demographics, ReferenceRange, TrendAnalysis, TrendPeriod,
    VitalType,
};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Metadata identifying the engine build that produced a report
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Everything the trend view needs to render one vital for one period
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VitalTrendReport {
    pub report_version: String,
    pub producer: ReportProducer,
    /// When the report was computed (UTC, RFC 3339)
    pub computed_at_utc: String,
    /// Reference day the trailing windows end at
    pub today: NaiveDate,
    pub vital: VitalType,
    pub period: TrendPeriod,
    /// Display metadata resolved from the catalog
    pub display_name: String,
    pub unit: String,
    pub color_token: String,
    /// Generic clinical range for the supplied demographics
    pub generic_range: ReferenceRange,
    /// Personalized range, absent when history is too short
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalized_range: Option<ReferenceRange>,
    pub trend: TrendAnalysis,
    /// Detected baseline shift, absent in the common no-shift case
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<BaselineShift>,
}

/// Report encoder with a stable per-process instance ID
pub struct TrendReportEncoder {
    instance_id: String,
}

impl Default for TrendReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Run the full analysis for one (vital, period) query and bundle the
    /// results.
    ///
    /// A too-short history downgrades the personalized range to absent and
    /// the trend to its sentinel; it never fails the whole report. The only
    /// errors surfaced here are caller bugs.
    pub fn evaluate(
        &self,
        history: &[DailyVitalsSummary],
        vital: VitalType,
        period: TrendPeriod,
        demographics: &Demographics,
        today: NaiveDate,
    ) -> VitalTrendReport {
        let generic_range = range::reference_range(vital, demographics);

        // NotEnoughHistory is the designed fallback path, not a failure
        let personalized_range = range::personalized_range(history, vital).ok();

        let trend = trend::analyze_trend(history, vital, period, today);
        let shift = shift::detect_baseline_shift(history, vital, today);

        VitalTrendReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            today,
            vital,
            period,
            display_name: crate::catalog::display_name(vital).to_string(),
            unit: crate::catalog::unit(vital).to_string(),
            color_token: crate::catalog::color_token(vital).to_string(),
            generic_range,
            personalized_range,
            trend,
            shift,
        }
    }

    /// Evaluate and serialize to a JSON string
    pub fn evaluate_to_json(
        &self,
        history: &[DailyVitalsSummary],
        vital: VitalType,
        period: TrendPeriod,
        demographics: &Demographics,
        today: NaiveDate,
    ) -> Result<String, EngineError> {
        let report = self.evaluate(history, vital, period, demographics, today);
        serde_json::to_string_pretty(&report).map_err(EngineError::JsonError)
    }
}
