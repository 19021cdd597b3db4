//! Prometheus-compatible HTTP probe source

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::response::QueryResponse;
use super::sample::{ProbeSeries, ProbeWindow};
use super::source::{ProbeSource, SourceError};
use crate::definition::AlertDefinition;

/// Queries a Prometheus-compatible HTTP API
///
/// Single-probe windows hit the instant endpoint, larger windows the range
/// endpoint. The query string itself is passed through opaquely.
#[derive(Debug, Clone)]
pub struct HttpProbeSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProbeSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn query(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<ProbeSeries>, SourceError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let decoded: QueryResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))?;

        if !decoded.is_success() {
            return Err(SourceError::Backend(decoded.error_message()));
        }

        Ok(decoded.into_series())
    }
}

#[async_trait]
impl ProbeSource for HttpProbeSource {
    async fn fetch(
        &self,
        def: &AlertDefinition,
        window: ProbeWindow,
    ) -> Result<Vec<ProbeSeries>, SourceError> {
        let end = Utc::now().timestamp();
        tracing::debug!(
            "Fetching {} probes at {}s step for {}",
            window.probes,
            window.step_secs,
            def.id
        );

        if window.is_single() {
            let url = format!("{}/api/v1/query", self.base_url);
            let params = [
                ("query", def.query.clone()),
                ("time", end.to_string()),
            ];
            self.query(&url, &params).await
        } else {
            let url = format!("{}/api/v1/query_range", self.base_url);
            let params = [
                ("query", def.query.clone()),
                ("start", range_start(end, window).to_string()),
                ("end", end.to_string()),
                ("step", window.step_secs.to_string()),
            ];
            self.query(&url, &params).await
        }
    }
}

/// Range start placing exactly `probes` aligned samples in the window
fn range_start(end: i64, window: ProbeWindow) -> i64 {
    let back = i64::from(window.probes.saturating_sub(1)) * window.step_secs as i64;
    end - back
}
