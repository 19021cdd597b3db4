//! Consecutive-probe debouncing
//!
//! One tracker per series counts back-to-back non-OK verdicts. A run
//! fires once, when it ends (on the terminating OK sample or on window
//! exhaustion), and only if it lasted at least the required number of
//! probes. Shorter runs produce nothing.

use super::classifier::Verdict;

/// Outcome of observing one verdict
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerDecision {
    /// Nothing to emit for this sample
    None,
    /// Debouncing disabled: hand the verdict straight to the emitter
    Immediate(Verdict),
    /// A consecutive run met the requirement and just ended
    Fire { verdict: Verdict, consecutive: u32 },
}

/// Per-series consecutive non-OK counter
///
/// A single counter serves both severities: when a run flips between
/// WARNING and ERROR the count keeps growing and the most recent verdict
/// decides what fires. A requirement of 0 disables debouncing and passes
/// every verdict through unchanged.
#[derive(Debug)]
pub struct ConsecutiveTracker {
    required: u32,
    count: u32,
    last_matching: Option<Verdict>,
}

impl ConsecutiveTracker {
    pub fn new(required: u32) -> Self {
        Self {
            required,
            count: 0,
            last_matching: None,
        }
    }

    /// Observe the next verdict, in timestamp order
    pub fn observe(&mut self, verdict: Verdict) -> TriggerDecision {
        if self.required == 0 {
            return TriggerDecision::Immediate(verdict);
        }

        if verdict.severity.is_ok() {
            // Ignored samples classify as OK, so they break runs too
            let decision = self.take_if_satisfied();
            self.count = 0;
            decision
        } else {
            self.count += 1;
            self.last_matching = Some(verdict);
            TriggerDecision::None
        }
    }

    /// End of window; exhaustion acts like an implicit trailing OK
    pub fn finish(&mut self) -> TriggerDecision {
        if self.required == 0 {
            return TriggerDecision::None;
        }
        let decision = self.take_if_satisfied();
        self.count = 0;
        decision
    }

    fn take_if_satisfied(&mut self) -> TriggerDecision {
        if self.count >= self.required {
            if let Some(verdict) = self.last_matching.take() {
                return TriggerDecision::Fire {
                    verdict,
                    consecutive: self.count,
                };
            }
        }
        self.last_matching = None;
        TriggerDecision::None
    }
}
