//! Run counters and the closing report line

use std::fmt;

/// Counters for one evaluation run
///
/// Blank and failed queries stay distinct all the way to the closing
/// report: a blank means the metric was absent, a failure means the
/// backend could not be asked. Operators react differently to each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Definitions evaluated, including blank and failed ones
    pub processed_definitions: usize,
    /// Queries that succeeded but held no usable value
    pub blank_queries: usize,
    /// Queries the backend failed to answer
    pub failed_queries: usize,
    /// Alert messages counted, whether or not their line was suppressed
    pub emitted_messages: usize,
    /// Telemetry records produced
    pub telemetry_records: usize,
    /// Series dropped by Exclude filters
    pub excluded_series: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.failed_queries > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} definitions processed: {} alert messages, {} telemetry records, {} blank queries, {} failed queries",
            self.processed_definitions,
            self.emitted_messages,
            self.telemetry_records,
            self.blank_queries,
            self.failed_queries,
        )
    }
}
