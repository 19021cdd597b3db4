//! Backend query response decoding
//!
//! The metrics backend answers in the Prometheus HTTP API shape. Decoding
//! happens once at this boundary; the engine only ever sees ordered
//! [`ProbeSeries`] sample lists.

use std::collections::HashMap;

use serde::Deserialize;

use super::sample::{ProbeSample, ProbeSeries};

/// Top-level response envelope
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<QueryData>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, rename = "errorType")]
    pub error_type: Option<String>,
}

impl QueryResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Diagnostic text for a non-success response
    pub fn error_message(&self) -> String {
        match (&self.error_type, &self.error) {
            (Some(kind), Some(msg)) => format!("{kind}: {msg}"),
            (None, Some(msg)) => msg.clone(),
            (Some(kind), None) => kind.clone(),
            (None, None) => format!("backend status {}", self.status),
        }
    }

    /// All result entries normalized to labeled sample lists
    pub fn into_series(self) -> Vec<ProbeSeries> {
        self.data
            .map(|d| d.result.into_iter().map(ProbeResult::into_series).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryData {
    #[serde(default)]
    pub result: Vec<ProbeResult>,
}

/// One result entry, in either the instant or the range shape
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProbeResult {
    /// Instant query: `"value": [ts, "v"]`
    Single {
        #[serde(default)]
        metric: HashMap<String, String>,
        value: SamplePair,
    },
    /// Range query: `"values": [[ts, "v"], ...]`
    Range {
        #[serde(default)]
        metric: HashMap<String, String>,
        values: Vec<SamplePair>,
    },
}

impl ProbeResult {
    pub fn into_series(self) -> ProbeSeries {
        match self {
            Self::Single { metric, value } => ProbeSeries {
                labels: metric,
                samples: vec![value.into_sample()],
            },
            Self::Range { metric, values } => ProbeSeries {
                labels: metric,
                samples: values.into_iter().map(SamplePair::into_sample).collect(),
            },
        }
    }
}

/// The `[ts, "v"]` pair: numeric timestamp, string-encoded value
#[derive(Debug, Deserialize)]
pub struct SamplePair(f64, String);

impl SamplePair {
    /// NaN and unparseable values become `None` and are dropped before
    /// classification.
    pub fn into_sample(self) -> ProbeSample {
        let value = match self.1.trim().parse::<f64>() {
            Ok(v) if !v.is_nan() => Some(v),
            _ => None,
        };
        ProbeSample::new(self.0, value)
    }
}
