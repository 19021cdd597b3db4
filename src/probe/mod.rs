//! Probe data: samples, backend response decoding, and sources
//!
//! A probe source turns one definition into a window of labeled
//! (timestamp, value) series. The HTTP source talks to a
//! Prometheus-compatible API; the static source replays canned data.

pub mod http;
pub mod response;
pub mod sample;
pub mod source;

pub use http::HttpProbeSource;
pub use response::{ProbeResult, QueryResponse};
pub use sample::{ProbeSample, ProbeSeries, ProbeWindow};
pub use source::{ProbeSource, SourceError, StaticProbeSource};
