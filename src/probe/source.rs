//! Probe result source abstraction

use std::collections::HashMap;

use async_trait::async_trait;

use super::sample::{ProbeSample, ProbeSeries, ProbeWindow};
use crate::definition::AlertDefinition;

/// Supplies one definition's probe window as labeled series
///
/// The fetch is the only suspension point in a run; implementations must
/// bound it with an explicit timeout so a stuck backend cannot stall the
/// whole evaluation.
#[async_trait]
pub trait ProbeSource: Send + Sync {
    async fn fetch(
        &self,
        def: &AlertDefinition,
        window: ProbeWindow,
    ) -> Result<Vec<ProbeSeries>, SourceError>;
}

/// Canned probe source keyed by definition ID
///
/// Replays fixed series (or scripted failures) regardless of the window,
/// for tests and offline replay of captured backend output. Unknown IDs
/// return an empty result, which the evaluator counts as a blank query.
#[derive(Debug, Default)]
pub struct StaticProbeSource {
    series: HashMap<String, Vec<ProbeSeries>>,
    failures: HashMap<String, String>,
}

impl StaticProbeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these series for a definition ID
    pub fn with_series(mut self, id: impl Into<String>, series: Vec<ProbeSeries>) -> Self {
        self.series.insert(id.into(), series);
        self
    }

    /// Serve a single unlabeled series built from raw samples
    pub fn with_samples(self, id: impl Into<String>, samples: Vec<ProbeSample>) -> Self {
        self.with_series(
            id,
            vec![ProbeSeries {
                labels: HashMap::new(),
                samples,
            }],
        )
    }

    /// Fail this definition ID with a backend error message
    pub fn with_failure(mut self, id: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(id.into(), message.into());
        self
    }
}

#[async_trait]
impl ProbeSource for StaticProbeSource {
    async fn fetch(
        &self,
        def: &AlertDefinition,
        _window: ProbeWindow,
    ) -> Result<Vec<ProbeSeries>, SourceError> {
        if let Some(message) = self.failures.get(&def.id) {
            return Err(SourceError::Backend(message.clone()));
        }
        Ok(self.series.get(&def.id).cloned().unwrap_or_default())
    }
}

/// Probe fetch errors; all count as failed queries, none abort the run
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend returned HTTP {0}")]
    Http(u16),

    #[error("Backend reported failure: {0}")]
    Backend(String),

    #[error("Undecodable response: {0}")]
    Decode(String),
}
