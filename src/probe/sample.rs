//! Probe samples, series, and window resolution

use std::collections::HashMap;

use crate::definition::AlertDefinition;

/// One sampled observation of a monitored metric
///
/// `value` is `None` when the backend returned nothing usable for the
/// instant (absent, NaN, or unparseable); such samples are dropped before
/// classification but still occupy a slot in the telemetry window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSample {
    /// Epoch seconds, fractional
    pub timestamp: f64,
    pub value: Option<f64>,
}

impl ProbeSample {
    pub fn new(timestamp: f64, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }
}

/// One labeled time series returned for a query
#[derive(Debug, Clone, Default)]
pub struct ProbeSeries {
    pub labels: HashMap<String, String>,
    /// Samples in timestamp order, as returned by the backend
    pub samples: Vec<ProbeSample>,
}

impl ProbeSeries {
    /// Value of a label on this series, if present
    pub fn label_value(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// Resolved sampling window for one definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeWindow {
    /// Sampling interval, seconds
    pub step_secs: u64,
    /// Number of probes in the window
    pub probes: u32,
}

impl ProbeWindow {
    /// Apply a definition's Step/Probes overrides to the run defaults
    pub fn resolve(def: &AlertDefinition, default_step_secs: u64, default_probes: u32) -> Self {
        Self {
            step_secs: def.step_secs.unwrap_or(default_step_secs),
            probes: def.probes.unwrap_or(default_probes),
        }
    }

    /// Single-probe windows use an instant query instead of a range
    pub fn is_single(&self) -> bool {
        self.probes <= 1
    }

    /// Total window span, seconds
    pub fn span_secs(&self) -> u64 {
        self.step_secs * u64::from(self.probes)
    }
}
