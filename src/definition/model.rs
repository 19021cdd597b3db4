//! Alert definition model: raw wire form and validated typed form

use serde::Deserialize;

use super::condition::{Condition, ConditionError};

/// Which identifier field named the definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Alert,
    Telemetry,
}

/// A validated alert or telemetry definition
///
/// Immutable after load. Conditions are parsed once here so the evaluator
/// never re-parses per sample.
#[derive(Debug, Clone)]
pub struct AlertDefinition {
    /// Unique ID within a run (from AlertID or TelemetryID)
    pub id: String,
    /// Which ID field the definition used
    pub kind: DefinitionKind,
    /// Human-readable description, carried into every record
    pub description: String,
    /// Opaque backend query string
    pub query: String,
    /// Warning threshold
    pub warning: Option<Condition>,
    /// Error threshold, evaluated before warning
    pub error: Option<Condition>,
    /// Values matching this are never actionable
    pub ignore: Option<Condition>,
    /// Metric label to fan results out by
    pub label: Option<String>,
    /// Label value whose series is dropped entirely
    pub exclude: Option<String>,
    /// Consecutive non-OK probes required before firing; 0 disables debouncing
    pub consecutive_probes: u32,
    /// Per-definition sampling interval override, seconds
    pub step_secs: Option<u64>,
    /// Per-definition window size override, in probes
    pub probes: Option<u32>,
    /// Advisory scheduling hint, never evaluated
    pub frequency: Option<String>,
}

impl AlertDefinition {
    /// Definitions without thresholds are aggregated, never classified
    pub fn is_telemetry(&self) -> bool {
        self.warning.is_none() && self.error.is_none()
    }

    /// Whether consecutive-probe debouncing applies
    pub fn debounced(&self) -> bool {
        self.consecutive_probes > 0
    }
}

/// Wire form of a definition as read from the JSON array
///
/// All fields are optional strings; numbers arrive string-encoded.
/// `validate` turns this into an [`AlertDefinition`] or the first
/// load-time error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDefinition {
    #[serde(rename = "AlertID")]
    pub alert_id: Option<String>,
    #[serde(rename = "TelemetryID")]
    pub telemetry_id: Option<String>,
    pub description: Option<String>,
    pub query: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub ignore: Option<String>,
    pub label: Option<String>,
    pub exclude: Option<String>,
    pub consecutive_probes: Option<String>,
    pub step: Option<String>,
    pub probes: Option<String>,
    pub frequency: Option<String>,
}

impl RawDefinition {
    /// Validate and convert into the typed form
    ///
    /// Exactly one of AlertID/TelemetryID must be set; Description and
    /// Query are required; conditions and numeric fields must parse.
    /// Empty strings count as absent.
    pub fn validate(self) -> Result<AlertDefinition, DefinitionError> {
        let (id, kind) = match (non_empty(self.alert_id), non_empty(self.telemetry_id)) {
            (Some(id), None) => (id, DefinitionKind::Alert),
            (None, Some(id)) => (id, DefinitionKind::Telemetry),
            (Some(id), Some(_)) => return Err(DefinitionError::AmbiguousId(id)),
            (None, None) => return Err(DefinitionError::MissingId),
        };

        let description = non_empty(self.description)
            .ok_or_else(|| DefinitionError::MissingDescription(id.clone()))?;
        let query =
            non_empty(self.query).ok_or_else(|| DefinitionError::MissingQuery(id.clone()))?;

        let warning = parse_condition(self.warning, "Warning", &id)?;
        let error = parse_condition(self.error, "Error", &id)?;
        let ignore = parse_condition(self.ignore, "Ignore", &id)?;

        if kind == DefinitionKind::Telemetry && (warning.is_some() || error.is_some()) {
            return Err(DefinitionError::TelemetryWithConditions(id));
        }

        let consecutive_probes =
            parse_number::<u32>(self.consecutive_probes, "ConsecutiveProbes", &id)?.unwrap_or(0);

        let step_secs = parse_number::<u64>(self.step, "Step", &id)?;
        if step_secs == Some(0) {
            return Err(DefinitionError::InvalidNumber {
                id,
                field: "Step",
                value: "0".to_string(),
            });
        }

        let probes = parse_number::<u32>(self.probes, "Probes", &id)?;
        if probes == Some(0) {
            return Err(DefinitionError::InvalidNumber {
                id,
                field: "Probes",
                value: "0".to_string(),
            });
        }

        Ok(AlertDefinition {
            id,
            kind,
            description,
            query,
            warning,
            error,
            ignore,
            label: non_empty(self.label),
            exclude: non_empty(self.exclude),
            consecutive_probes,
            step_secs,
            probes,
            frequency: non_empty(self.frequency),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_condition(
    raw: Option<String>,
    field: &'static str,
    id: &str,
) -> Result<Option<Condition>, DefinitionError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(s) => Condition::parse(&s)
            .map(Some)
            .map_err(|source| DefinitionError::Condition {
                id: id.to_string(),
                field,
                source,
            }),
    }
}

fn parse_number<T: std::str::FromStr>(
    raw: Option<String>,
    field: &'static str,
    id: &str,
) -> Result<Option<T>, DefinitionError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(s) => {
            s.trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| DefinitionError::InvalidNumber {
                    id: id.to_string(),
                    field,
                    value: s,
                })
        }
    }
}

/// Definition validation errors (fatal at load)
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("Definition has neither AlertID nor TelemetryID")]
    MissingId,

    #[error("Definition {0} has both AlertID and TelemetryID")]
    AmbiguousId(String),

    #[error("Definition {0} is missing a Description")]
    MissingDescription(String),

    #[error("Definition {0} is missing a Query")]
    MissingQuery(String),

    #[error("Definition {id}: bad {field} condition: {source}")]
    Condition {
        id: String,
        field: &'static str,
        #[source]
        source: ConditionError,
    },

    #[error("Definition {id}: {field} is not a valid count: {value}")]
    InvalidNumber {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("Telemetry definition {0} must not set Warning or Error")]
    TelemetryWithConditions(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::condition::CompareOp;

    fn make_raw() -> RawDefinition {
        RawDefinition {
            alert_id: Some("http_errors".to_string()),
            description: Some("HTTP 5xx rate".to_string()),
            query: Some("rate(http_errors_total[5m])".to_string()),
            error: Some("> 10".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_alert() {
        let def = make_raw().validate().unwrap();
        assert_eq!(def.id, "http_errors");
        assert_eq!(def.kind, DefinitionKind::Alert);
        assert_eq!(def.description, "HTTP 5xx rate");
        assert_eq!(def.error.as_ref().unwrap().op, CompareOp::GreaterThan);
        assert!(def.warning.is_none());
        assert_eq!(def.consecutive_probes, 0);
        assert!(!def.debounced());
        assert!(!def.is_telemetry());
    }

    #[test]
    fn test_validate_telemetry() {
        let raw = RawDefinition {
            alert_id: None,
            telemetry_id: Some("disk_free".to_string()),
            error: None,
            ..make_raw()
        };
        let def = raw.validate().unwrap();
        assert_eq!(def.kind, DefinitionKind::Telemetry);
        assert!(def.is_telemetry());
    }

    #[test]
    fn test_alert_without_thresholds_is_telemetry() {
        let raw = RawDefinition {
            error: None,
            ..make_raw()
        };
        let def = raw.validate().unwrap();
        assert_eq!(def.kind, DefinitionKind::Alert);
        assert!(def.is_telemetry());
    }

    #[test]
    fn test_validate_id_fields() {
        let raw = RawDefinition {
            alert_id: None,
            ..make_raw()
        };
        assert!(matches!(raw.validate(), Err(DefinitionError::MissingId)));

        let raw = RawDefinition {
            telemetry_id: Some("other".to_string()),
            ..make_raw()
        };
        assert!(matches!(
            raw.validate(),
            Err(DefinitionError::AmbiguousId(_))
        ));

        // Empty strings count as absent
        let raw = RawDefinition {
            alert_id: Some("  ".to_string()),
            ..make_raw()
        };
        assert!(matches!(raw.validate(), Err(DefinitionError::MissingId)));
    }

    #[test]
    fn test_validate_required_fields() {
        let raw = RawDefinition {
            description: None,
            ..make_raw()
        };
        assert!(matches!(
            raw.validate(),
            Err(DefinitionError::MissingDescription(_))
        ));

        let raw = RawDefinition {
            query: Some(String::new()),
            ..make_raw()
        };
        assert!(matches!(
            raw.validate(),
            Err(DefinitionError::MissingQuery(_))
        ));
    }

    #[test]
    fn test_validate_bad_condition() {
        let raw = RawDefinition {
            warning: Some(">= 5".to_string()),
            ..make_raw()
        };
        match raw.validate() {
            Err(DefinitionError::Condition { id, field, .. }) => {
                assert_eq!(id, "http_errors");
                assert_eq!(field, "Warning");
            }
            other => panic!("expected condition error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_numbers() {
        let raw = RawDefinition {
            consecutive_probes: Some("3".to_string()),
            step: Some("30".to_string()),
            probes: Some("10".to_string()),
            ..make_raw()
        };
        let def = raw.validate().unwrap();
        assert_eq!(def.consecutive_probes, 3);
        assert!(def.debounced());
        assert_eq!(def.step_secs, Some(30));
        assert_eq!(def.probes, Some(10));

        // Zero disables debouncing but is rejected for Step/Probes
        let raw = RawDefinition {
            consecutive_probes: Some("0".to_string()),
            ..make_raw()
        };
        assert_eq!(raw.validate().unwrap().consecutive_probes, 0);

        let raw = RawDefinition {
            step: Some("0".to_string()),
            ..make_raw()
        };
        assert!(matches!(
            raw.validate(),
            Err(DefinitionError::InvalidNumber { field: "Step", .. })
        ));

        let raw = RawDefinition {
            probes: Some("-2".to_string()),
            ..make_raw()
        };
        assert!(matches!(
            raw.validate(),
            Err(DefinitionError::InvalidNumber { field: "Probes", .. })
        ));
    }

    #[test]
    fn test_telemetry_with_thresholds_rejected() {
        let raw = RawDefinition {
            alert_id: None,
            telemetry_id: Some("disk_free".to_string()),
            ..make_raw()
        };
        assert!(matches!(
            raw.validate(),
            Err(DefinitionError::TelemetryWithConditions(_))
        ));
    }

    #[test]
    fn test_deserialize_wire_names() {
        let raw: RawDefinition = serde_json::from_str(
            r#"{
                "AlertID": "latency",
                "Description": "p95 latency",
                "Query": "histogram_quantile(0.95, latency_bucket)",
                "Warning": "> 800",
                "Error": "> 1500 hard limit",
                "Ignore": "== 0",
                "Label": "instance",
                "Exclude": "canary",
                "ConsecutiveProbes": "3",
                "Step": "60",
                "Probes": "5",
                "Frequency": "hourly"
            }"#,
        )
        .unwrap();
        let def = raw.validate().unwrap();
        assert_eq!(def.id, "latency");
        assert_eq!(def.label.as_deref(), Some("instance"));
        assert_eq!(def.exclude.as_deref(), Some("canary"));
        assert_eq!(def.error.as_ref().unwrap().comment.as_deref(), Some("hard limit"));
        assert_eq!(def.frequency.as_deref(), Some("hourly"));
    }
}
