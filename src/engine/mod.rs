//! The evaluation engine
//!
//! Pure classification, per-series debouncing, label fan-out, and window
//! aggregation, driven by the [`evaluator::Evaluator`] run loop.

pub mod classifier;
pub mod debounce;
pub mod evaluator;
pub mod fanout;
pub mod telemetry;

pub use classifier::{classify, Severity, Verdict};
pub use debounce::{ConsecutiveTracker, TriggerDecision};
pub use evaluator::{EvalOptions, Evaluator};
pub use fanout::{fan_out, Fanout, SeriesGroup, SeriesKey};
pub use telemetry::{aggregate, TelemetrySummary};
