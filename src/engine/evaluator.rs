//! The evaluation run loop

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;

use super::classifier::classify;
use super::debounce::{ConsecutiveTracker, TriggerDecision};
use super::fanout::{fan_out, SeriesGroup};
use super::telemetry::aggregate;
use crate::definition::{AlertDefinition, Registry};
use crate::probe::{ProbeSeries, ProbeSource, ProbeWindow, SourceError};
use crate::report::{Emitter, RunReport};

/// Run-wide evaluation options
#[derive(Debug, Clone, Copy)]
pub struct EvalOptions {
    /// Default sampling interval, seconds
    pub step_secs: u64,
    /// Default window size, in probes
    pub probes: u32,
    /// Also emit first-occurrence OK verdicts
    pub verbose: bool,
    /// Definitions fetched concurrently; 1 keeps the run strictly sequential
    pub concurrency: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            step_secs: 60,
            probes: 5,
            verbose: false,
            concurrency: 1,
        }
    }
}

/// Drives one evaluation run over a registry
///
/// Fetches may overlap across definitions (they share no state), but
/// results are consumed in registry order and samples are processed in
/// timestamp order within each series, so output is identical at any
/// concurrency level. A run is one-shot: per-series state never survives
/// it.
pub struct Evaluator<S> {
    registry: Registry,
    source: S,
    options: EvalOptions,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl<S: ProbeSource> Evaluator<S> {
    pub fn new(registry: Registry, source: S, options: EvalOptions) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        Self {
            registry,
            source,
            options,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Sender that cancels the run; pending fetches are dropped,
    /// already-emitted records are kept
    pub fn shutdown_handle(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Evaluate every definition and produce the run report
    ///
    /// The returned future owns all run state and can be spawned as a task.
    pub async fn run(mut self) -> RunReport {
        let mut emitter = Emitter::new(self.options.verbose);
        let concurrency = self.options.concurrency.max(1);

        tracing::debug!(
            "Starting evaluation run: {} definitions, concurrency {}",
            self.registry.len(),
            concurrency
        );

        // Owned definitions: prefetch futures that borrowed registry items
        // would not satisfy the Send obligations of a spawned run.
        let fetches = stream::iter(self.registry.iter().cloned())
            .map(|def| {
                let window =
                    ProbeWindow::resolve(&def, self.options.step_secs, self.options.probes);
                let source = &self.source;
                async move {
                    let result = source.fetch(&def, window).await;
                    (def, window, result)
                }
            })
            .buffered(concurrency);
        tokio::pin!(fetches);

        loop {
            tokio::select! {
                next = fetches.next() => {
                    match next {
                        Some((def, window, result)) => {
                            Self::evaluate_definition(&mut emitter, &def, window, result);
                        }
                        None => break,
                    }
                }
                _ = self.shutdown_rx.recv() => {
                    tracing::info!("Evaluation run cancelled");
                    break;
                }
            }
        }

        let report = emitter.finish();
        tracing::info!("Evaluation run complete: {}", report.summary);
        report
    }

    /// Evaluate one definition's fetched window; errors stay local
    fn evaluate_definition(
        emitter: &mut Emitter,
        def: &AlertDefinition,
        window: ProbeWindow,
        result: Result<Vec<ProbeSeries>, SourceError>,
    ) {
        emitter.note_definition();

        let series = match result {
            Ok(series) => series,
            Err(err) => {
                emitter.note_failed(def, &err);
                return;
            }
        };

        // Blank: the query succeeded but no series holds a usable value
        let has_value = series
            .iter()
            .flat_map(|s| &s.samples)
            .any(|s| s.value.is_some());
        if !has_value {
            emitter.note_blank(def);
            return;
        }

        let fanout = fan_out(def, series);
        emitter.note_excluded(fanout.excluded);

        for group in &fanout.groups {
            if def.is_telemetry() {
                if let Some(summary) = aggregate(&group.samples) {
                    emitter.emit_telemetry(def, &group.key, &summary);
                }
            } else {
                Self::evaluate_group(emitter, def, window, group);
            }
        }
    }

    /// Drive one series through classification and debouncing
    fn evaluate_group(
        emitter: &mut Emitter,
        def: &AlertDefinition,
        window: ProbeWindow,
        group: &SeriesGroup,
    ) {
        let mut tracker = ConsecutiveTracker::new(def.consecutive_probes);

        for sample in &group.samples {
            let Some(verdict) = classify(*sample, def) else {
                continue;
            };
            match tracker.observe(verdict) {
                TriggerDecision::None => {}
                TriggerDecision::Immediate(verdict) => {
                    emitter.emit_immediate(def, &group.key, &verdict, window);
                }
                TriggerDecision::Fire {
                    verdict,
                    consecutive,
                } => {
                    emitter.emit_trigger(def, &group.key, &verdict, consecutive, window);
                }
            }
        }

        if let TriggerDecision::Fire {
            verdict,
            consecutive,
        } = tracker.finish()
        {
            emitter.emit_trigger(def, &group.key, &verdict, consecutive, window);
        }
    }
}
