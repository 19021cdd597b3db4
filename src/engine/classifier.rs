//! Sample classification against definition thresholds

use std::fmt;

use serde::Serialize;

use crate::definition::AlertDefinition;
use crate::probe::ProbeSample;

/// Verdict severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Warning,
    Error,
    Telemetry,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Telemetry => "TELEMETRY",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Severity::Ok)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification outcome for one sample
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub severity: Severity,
    /// The comparison that decided the verdict, e.g. `"1600 > 1500"`,
    /// or just the value when nothing matched
    pub condition: String,
    pub sample: ProbeSample,
    /// OK because an ignore rule (or the negative-value rule) matched
    pub ignored: bool,
}

/// Classify one sample against a definition's thresholds
///
/// Returns `None` for samples without a usable value; those are dropped
/// before classification and never reach the debouncer.
///
/// Precedence: ignore (and any negative value) wins over everything,
/// then error before warning. Definitions without thresholds yield a
/// telemetry verdict; the evaluator routes those through aggregation
/// instead of calling this.
pub fn classify(sample: ProbeSample, def: &AlertDefinition) -> Option<Verdict> {
    let value = sample.value?;

    if let Some(ignore) = &def.ignore {
        if ignore.holds(value) {
            return Some(Verdict {
                severity: Severity::Ok,
                condition: ignore.describe(value),
                sample,
                ignored: true,
            });
        }
    }
    // Negative values are non-actionable telemetry noise, never errors
    if value < 0.0 {
        return Some(Verdict {
            severity: Severity::Ok,
            condition: value.to_string(),
            sample,
            ignored: true,
        });
    }

    if def.is_telemetry() {
        return Some(Verdict {
            severity: Severity::Telemetry,
            condition: value.to_string(),
            sample,
            ignored: false,
        });
    }

    if let Some(error) = &def.error {
        if error.holds(value) {
            return Some(Verdict {
                severity: Severity::Error,
                condition: error.describe(value),
                sample,
                ignored: false,
            });
        }
    }
    if let Some(warning) = &def.warning {
        if warning.holds(value) {
            return Some(Verdict {
                severity: Severity::Warning,
                condition: warning.describe(value),
                sample,
                ignored: false,
            });
        }
    }

    Some(Verdict {
        severity: Severity::Ok,
        condition: value.to_string(),
        sample,
        ignored: false,
    })
}
