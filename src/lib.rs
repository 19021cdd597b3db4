//! Promwatch: Threshold Alert Evaluation over Prometheus-Compatible Backends
//!
//! Evaluates a declarative set of alert and telemetry definitions against
//! windows of sampled probe data: per metric, per label value, each probe
//! window is classified against ignore/warning/error thresholds, debounced
//! by consecutive-probe count, and rendered into structured records,
//! de-duplicated report lines, and a closing run summary.
//!
//! # Features
//!
//! - **Declarative definitions**: JSON array, validated once at load
//! - **Label fan-out**: one query split into independent per-label series,
//!   with exact-match exclusion
//! - **Ignore rules**: matching values (and all negative values) are never
//!   actionable
//! - **Consecutive-probe debouncing**: a threshold crossing fires only
//!   after holding for N back-to-back probes
//! - **Telemetry aggregation**: min/max/avg windows for definitions
//!   without thresholds
//! - **First-occurrence suppression**: one line per series and severity,
//!   every occurrence still counted
//! - **Run summary**: blank and failed queries surfaced distinctly
//!
//! # Example
//!
//! ```no_run
//! use promwatch::definition::Registry;
//! use promwatch::engine::{EvalOptions, Evaluator};
//! use promwatch::probe::HttpProbeSource;
//!
//! # async fn example() {
//! let registry = Registry::from_file("definitions.json").unwrap();
//! let source = HttpProbeSource::new("http://127.0.0.1:9090");
//!
//! let report = Evaluator::new(registry, source, EvalOptions::default())
//!     .run()
//!     .await;
//!
//! for line in &report.lines {
//!     println!("{line}");
//! }
//! println!("{}", report.summary);
//! # }
//! ```

pub mod definition;
pub mod engine;
pub mod probe;
pub mod report;

// Re-export commonly used types
pub use definition::{AlertDefinition, Registry, RegistryError};
pub use engine::{EvalOptions, Evaluator, Severity};
pub use probe::{HttpProbeSource, ProbeSource, StaticProbeSource};
pub use report::{AlertRecord, RunReport, RunSummary};
