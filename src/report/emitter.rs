//! Record and line emission with per-series suppression

use std::collections::HashSet;

use super::record::{AlertRecord, ConditionalRecord, TelemetryRecord};
use super::summary::RunSummary;
use crate::definition::AlertDefinition;
use crate::engine::classifier::{Severity, Verdict};
use crate::engine::fanout::SeriesKey;
use crate::engine::telemetry::TelemetrySummary;
use crate::probe::ProbeWindow;

/// Everything one run produced
#[derive(Debug)]
pub struct RunReport {
    /// Structured records, in emission order
    pub records: Vec<AlertRecord>,
    /// Human-readable lines, parallel to the records
    pub lines: Vec<String>,
    pub summary: RunSummary,
}

/// Turns verdicts and telemetry summaries into records and lines
///
/// Emission is append-only. In undebounced mode only the first occurrence
/// of each (series, severity) produces output; later occurrences still
/// increment the message counter. OK verdicts surface only in verbose
/// mode. Debounced triggers bypass the seen-set: the tracker already
/// de-duplicated them.
#[derive(Debug)]
pub struct Emitter {
    verbose: bool,
    seen: HashSet<(SeriesKey, Severity)>,
    records: Vec<AlertRecord>,
    lines: Vec<String>,
    summary: RunSummary,
}

impl Emitter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            seen: HashSet::new(),
            records: Vec::new(),
            lines: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    /// One undebounced verdict
    pub fn emit_immediate(
        &mut self,
        def: &AlertDefinition,
        key: &SeriesKey,
        verdict: &Verdict,
        window: ProbeWindow,
    ) {
        if verdict.severity.is_ok() && !self.verbose {
            return;
        }
        self.summary.emitted_messages += 1;

        if !self.seen.insert((key.clone(), verdict.severity)) {
            return;
        }

        let record = ConditionalRecord::new(def, verdict, key, None, window.step_secs);
        self.lines.push(conditional_line(def, key, verdict, None));
        self.records.push(AlertRecord::Conditional(record));
    }

    /// The final trigger of a debounced run
    pub fn emit_trigger(
        &mut self,
        def: &AlertDefinition,
        key: &SeriesKey,
        verdict: &Verdict,
        consecutive: u32,
        window: ProbeWindow,
    ) {
        self.summary.emitted_messages += 1;

        let record = ConditionalRecord::new(def, verdict, key, Some(consecutive), window.step_secs);
        self.lines
            .push(conditional_line(def, key, verdict, Some(consecutive)));
        self.records.push(AlertRecord::Conditional(record));
    }

    /// One telemetry window summary
    pub fn emit_telemetry(
        &mut self,
        def: &AlertDefinition,
        key: &SeriesKey,
        summary: &TelemetrySummary,
    ) {
        self.summary.telemetry_records += 1;

        let record = TelemetryRecord::new(def, summary);
        self.lines.push(telemetry_line(def, key, summary));
        self.records.push(AlertRecord::Telemetry(record));
    }

    pub fn note_definition(&mut self) {
        self.summary.processed_definitions += 1;
    }

    pub fn note_blank(&mut self, def: &AlertDefinition) {
        self.summary.blank_queries += 1;
        tracing::debug!("Blank query for {}: no usable value", def.id);
    }

    pub fn note_failed(&mut self, def: &AlertDefinition, error: &dyn std::fmt::Display) {
        self.summary.failed_queries += 1;
        tracing::error!("Query failed for {}: {}", def.id, error);
    }

    pub fn note_excluded(&mut self, count: usize) {
        self.summary.excluded_series += count;
    }

    pub fn finish(self) -> RunReport {
        RunReport {
            records: self.records,
            lines: self.lines,
            summary: self.summary,
        }
    }
}

/// `<LEVEL> : <id> : <desc> : <condition> [k=v][ts] [N|all probes]`
fn conditional_line(
    def: &AlertDefinition,
    key: &SeriesKey,
    verdict: &Verdict,
    consecutive: Option<u32>,
) -> String {
    let mut context = String::new();
    if let (Some(label), Some(value)) = (&def.label, &key.label_value) {
        context.push_str(&format!("[{label}={value}]"));
    }
    context.push_str(&format!("[{}]", verdict.sample.timestamp));

    let probes = match consecutive {
        Some(n) => format!("{n} probes"),
        None => "all probes".to_string(),
    };

    format!(
        "{} : {} : {} : {} {} [{}]",
        verdict.severity, def.id, def.description, verdict.condition, context, probes
    )
}

/// `TELEMETRY : <id> : <desc> : avg=.. max=.. min=.. [k=v][start-end]`
fn telemetry_line(def: &AlertDefinition, key: &SeriesKey, summary: &TelemetrySummary) -> String {
    let mut context = String::new();
    if let (Some(label), Some(value)) = (&def.label, &key.label_value) {
        context.push_str(&format!("[{label}={value}]"));
    }
    context.push_str(&format!(
        "[{}-{}]",
        summary.window_start, summary.window_end
    ));

    format!(
        "TELEMETRY : {} : {} : avg={} max={} min={} {}",
        def.id, def.description, summary.avg, summary.max, summary.min, context
    )
}
