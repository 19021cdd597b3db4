//! Window aggregation for telemetry definitions

use crate::probe::ProbeSample;

/// Min/max/avg reduction of one probe window
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// Earliest timestamp in the window, valid or not
    pub window_start: f64,
    /// Latest timestamp in the window, valid or not
    pub window_end: f64,
}

/// Reduce an ordered probe window to a [`TelemetrySummary`]
///
/// Samples without a value are skipped for min/max/sum but still count
/// toward the average's divisor: the divisor is the full window size, so
/// `[10, _, 20]` averages 10, not 15. Window bounds come from every
/// timestamp regardless of validity. Returns `None` when the window holds
/// no valid sample at all.
pub fn aggregate(samples: &[ProbeSample]) -> Option<TelemetrySummary> {
    let first = samples.first()?;
    let mut window_start = first.timestamp;
    let mut window_end = first.timestamp;

    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    let mut sum = 0.0;

    for sample in samples {
        window_start = window_start.min(sample.timestamp);
        window_end = window_end.max(sample.timestamp);

        if let Some(value) = sample.value {
            sum += value;
            min = Some(min.map_or(value, |m| m.min(value)));
            max = Some(max.map_or(value, |m| m.max(value)));
        }
    }

    Some(TelemetrySummary {
        min: min?,
        max: max?,
        avg: sum / samples.len() as f64,
        window_start,
        window_end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: f64, value: Option<f64>) -> ProbeSample {
        ProbeSample::new(ts, value)
    }

    #[test]
    fn test_basic_window() {
        let summary = aggregate(&[
            sample(100.0, Some(5.0)),
            sample(160.0, Some(7.0)),
            sample(220.0, Some(9.0)),
        ])
        .unwrap();

        assert_eq!(summary.min, 5.0);
        assert_eq!(summary.max, 9.0);
        assert_eq!(summary.avg, 7.0);
        assert_eq!(summary.window_start, 100.0);
        assert_eq!(summary.window_end, 220.0);
    }

    #[test]
    fn test_divisor_is_window_size() {
        // The invalid middle sample still divides the sum
        let summary = aggregate(&[
            sample(100.0, Some(10.0)),
            sample(160.0, None),
            sample(220.0, Some(20.0)),
        ])
        .unwrap();

        assert_eq!(summary.avg, 10.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 20.0);
    }

    #[test]
    fn test_bounds_include_invalid_samples() {
        let summary = aggregate(&[
            sample(100.0, None),
            sample(160.0, Some(3.0)),
            sample(220.0, None),
        ])
        .unwrap();

        assert_eq!(summary.window_start, 100.0);
        assert_eq!(summary.window_end, 220.0);
        assert_eq!(summary.min, 3.0);
        assert_eq!(summary.max, 3.0);
    }

    #[test]
    fn test_no_valid_samples() {
        assert!(aggregate(&[]).is_none());
        assert!(aggregate(&[sample(100.0, None), sample(160.0, None)]).is_none());
    }

    #[test]
    fn test_single_sample_seeds_min_and_max() {
        let summary = aggregate(&[sample(100.0, Some(4.5))]).unwrap();
        assert_eq!(summary.min, 4.5);
        assert_eq!(summary.max, 4.5);
        assert_eq!(summary.avg, 4.5);
    }

    #[test]
    fn test_negative_values_aggregate() {
        // Negative suppression applies to classification, not telemetry
        let summary = aggregate(&[sample(100.0, Some(-2.0)), sample(160.0, Some(4.0))]).unwrap();
        assert_eq!(summary.min, -2.0);
        assert_eq!(summary.max, 4.0);
        assert_eq!(summary.avg, 1.0);
    }
}
