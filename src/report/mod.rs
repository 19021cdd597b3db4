//! Output: structured records, human-readable lines, run summary

pub mod emitter;
pub mod record;
pub mod summary;

pub use emitter::{Emitter, RunReport};
pub use record::{AlertRecord, ConditionalRecord, TelemetryRecord};
pub use summary::RunSummary;
