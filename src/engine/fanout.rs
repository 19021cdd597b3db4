//! Label fan-out: one query result, independent per-label series

use std::collections::HashMap;

use crate::definition::AlertDefinition;
use crate::probe::{ProbeSample, ProbeSeries};

/// Evaluation unit identity: one definition for one label value,
/// or the whole result when the definition has no Label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub alert_id: String,
    pub label_value: Option<String>,
}

impl SeriesKey {
    pub fn unlabeled(alert_id: &str) -> Self {
        Self {
            alert_id: alert_id.to_string(),
            label_value: None,
        }
    }

    pub fn labeled(alert_id: &str, value: &str) -> Self {
        Self {
            alert_id: alert_id.to_string(),
            label_value: Some(value.to_string()),
        }
    }
}

/// One fan-out group: ordered samples for one series key
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesGroup {
    pub key: SeriesKey,
    pub samples: Vec<ProbeSample>,
}

/// Fan-out result
#[derive(Debug, Default)]
pub struct Fanout {
    /// Groups in first-seen order
    pub groups: Vec<SeriesGroup>,
    /// Input series dropped by the Exclude filter
    pub excluded: usize,
}

/// Group a query's series by the definition's label
///
/// Without a Label every returned series folds into one unlabeled group,
/// samples concatenated in input order. With a Label, grouping is exact
/// string match on that label's value; a series missing the label lands
/// in the empty-string group. A group matching Exclude is dropped whole:
/// no records, no per-series counters, only the internal excluded count.
pub fn fan_out(def: &AlertDefinition, series: Vec<ProbeSeries>) -> Fanout {
    let Some(label) = def.label.as_deref() else {
        let mut samples: Vec<ProbeSample> = Vec::new();
        for entry in series {
            samples.extend(entry.samples);
        }
        return Fanout {
            groups: vec![SeriesGroup {
                key: SeriesKey::unlabeled(&def.id),
                samples,
            }],
            excluded: 0,
        };
    };

    let mut fanout = Fanout::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in series {
        let value = entry.label_value(label).unwrap_or("").to_string();

        if def.exclude.as_deref() == Some(value.as_str()) {
            fanout.excluded += 1;
            tracing::debug!("Excluding series {}={} for {}", label, value, def.id);
            continue;
        }

        match index.get(&value) {
            Some(&at) => fanout.groups[at].samples.extend(entry.samples),
            None => {
                index.insert(value.clone(), fanout.groups.len());
                fanout.groups.push(SeriesGroup {
                    key: SeriesKey::labeled(&def.id, &value),
                    samples: entry.samples,
                });
            }
        }
    }

    fanout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::RawDefinition;

    fn make_def(label: Option<&str>, exclude: Option<&str>) -> AlertDefinition {
        RawDefinition {
            alert_id: Some("f".to_string()),
            description: Some("fanout".to_string()),
            query: Some("up".to_string()),
            error: Some("> 1".to_string()),
            label: label.map(String::from),
            exclude: exclude.map(String::from),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    fn make_series(labels: &[(&str, &str)], timestamps: &[f64]) -> ProbeSeries {
        ProbeSeries {
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            samples: timestamps
                .iter()
                .map(|&ts| ProbeSample::new(ts, Some(1.0)))
                .collect(),
        }
    }

    #[test]
    fn test_unlabeled_single_group() {
        let def = make_def(None, None);
        let fanout = fan_out(
            &def,
            vec![
                make_series(&[("instance", "web-1")], &[100.0, 160.0]),
                make_series(&[("instance", "web-2")], &[100.0]),
            ],
        );

        assert_eq!(fanout.groups.len(), 1);
        assert_eq!(fanout.groups[0].key, SeriesKey::unlabeled("f"));
        let order: Vec<f64> = fanout.groups[0].samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(order, vec![100.0, 160.0, 100.0]);
    }

    #[test]
    fn test_labeled_groups_first_seen_order() {
        let def = make_def(Some("instance"), None);
        let fanout = fan_out(
            &def,
            vec![
                make_series(&[("instance", "web-2")], &[100.0]),
                make_series(&[("instance", "web-1")], &[100.0]),
                make_series(&[("instance", "web-2")], &[160.0]),
            ],
        );

        assert_eq!(fanout.groups.len(), 2);
        assert_eq!(fanout.groups[0].key, SeriesKey::labeled("f", "web-2"));
        assert_eq!(fanout.groups[1].key, SeriesKey::labeled("f", "web-1"));
        // Same label value merges, input order preserved
        let order: Vec<f64> = fanout.groups[0].samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(order, vec![100.0, 160.0]);
    }

    #[test]
    fn test_missing_label_is_empty_string_group() {
        let def = make_def(Some("instance"), None);
        let fanout = fan_out(&def, vec![make_series(&[("job", "node")], &[100.0])]);

        assert_eq!(fanout.groups.len(), 1);
        assert_eq!(fanout.groups[0].key, SeriesKey::labeled("f", ""));
    }

    #[test]
    fn test_exclusion_drops_whole_series() {
        let def = make_def(Some("instance"), Some("canary"));
        let fanout = fan_out(
            &def,
            vec![
                make_series(&[("instance", "canary")], &[100.0, 160.0]),
                make_series(&[("instance", "web-1")], &[100.0]),
                make_series(&[("instance", "canary")], &[220.0]),
            ],
        );

        assert_eq!(fanout.excluded, 2);
        assert_eq!(fanout.groups.len(), 1);
        assert_eq!(fanout.groups[0].key, SeriesKey::labeled("f", "web-1"));
    }

    #[test]
    fn test_exclusion_is_exact_match() {
        let def = make_def(Some("instance"), Some("web"));
        let fanout = fan_out(&def, vec![make_series(&[("instance", "web-1")], &[100.0])]);
        assert_eq!(fanout.excluded, 0);
        assert_eq!(fanout.groups.len(), 1);
    }

    #[test]
    fn test_labeled_empty_input() {
        let def = make_def(Some("instance"), None);
        let fanout = fan_out(&def, vec![]);
        assert!(fanout.groups.is_empty());
        assert_eq!(fanout.excluded, 0);
    }
}
