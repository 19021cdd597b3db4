//! Structured output records

use serde::Serialize;

use crate::definition::AlertDefinition;
use crate::engine::classifier::{Severity, Verdict};
use crate::engine::fanout::SeriesKey;
use crate::engine::telemetry::TelemetrySummary;

/// One emitted record, in exactly one of the two output shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AlertRecord {
    Conditional(ConditionalRecord),
    Telemetry(TelemetryRecord),
}

impl AlertRecord {
    pub fn alert_id(&self) -> &str {
        match self {
            AlertRecord::Conditional(r) => &r.alert_id,
            AlertRecord::Telemetry(r) => &r.alert_id,
        }
    }
}

/// Record for a classified verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConditionalRecord {
    #[serde(rename = "AlertID")]
    pub alert_id: String,
    pub description: String,
    pub severity_level: Severity,
    /// The comparison that fired, e.g. `"1600 > 1500"`
    pub alert_condition: String,
    /// The triggering sample as `[ts, "v"]`
    pub value: (f64, String),
    /// Present only for debounced triggers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consecutive_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_value: Option<String>,
    /// Sampling interval used for the window, seconds
    pub probe_interval: u64,
}

impl ConditionalRecord {
    pub fn new(
        def: &AlertDefinition,
        verdict: &Verdict,
        key: &SeriesKey,
        consecutive_count: Option<u32>,
        probe_interval: u64,
    ) -> Self {
        Self {
            alert_id: def.id.clone(),
            description: def.description.clone(),
            severity_level: verdict.severity,
            alert_condition: verdict.condition.clone(),
            value: (
                verdict.sample.timestamp,
                verdict.sample.value.map_or_else(String::new, |v| v.to_string()),
            ),
            consecutive_count,
            label_key: key.label_value.as_ref().and(def.label.clone()),
            label_value: key.label_value.clone(),
            probe_interval,
        }
    }
}

/// Record for an aggregated telemetry window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TelemetryRecord {
    #[serde(rename = "AlertID")]
    pub alert_id: String,
    pub description: String,
    /// `[windowStart, windowEnd, "avg", "max", "min"]`
    pub value_min_max_avg: (f64, f64, String, String, String),
}

impl TelemetryRecord {
    pub fn new(def: &AlertDefinition, summary: &TelemetrySummary) -> Self {
        Self {
            alert_id: def.id.clone(),
            description: def.description.clone(),
            value_min_max_avg: (
                summary.window_start,
                summary.window_end,
                summary.avg.to_string(),
                summary.max.to_string(),
                summary.min.to_string(),
            ),
        }
    }
}
