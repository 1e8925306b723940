//! Row layouts of the two metrics logs.

use serde::{Deserialize, Serialize};

use crate::aggregate::RunAggregate;
use crate::model::{PerformanceSample, RunStamp};

pub const SUMMARY_COLUMNS: [&str; 15] = [
    "commit_hash",
    "date",
    "total_tests",
    "passed",
    "failed",
    "broken",
    "skipped",
    "unknown",
    "pass_rate",
    "total_duration_ms",
    "avg_duration_ms",
    "min_duration_ms",
    "max_duration_ms",
    "total_retries",
    "flaky_tests",
];

pub const PERFORMANCE_COLUMNS: [&str; 9] = [
    "commit_hash",
    "date",
    "test_name",
    "status",
    "min_time",
    "max_time",
    "avg_time",
    "run_count",
    "all_runs",
];

/// One line of `summary_metrics.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub commit_hash: String,
    pub date: String,
    pub total_tests: u64,
    pub passed: u64,
    pub failed: u64,
    pub broken: u64,
    pub skipped: u64,
    pub unknown: u64,
    pub pass_rate: f64,
    pub total_duration_ms: u64,
    pub avg_duration_ms: f64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    pub total_retries: u64,
    pub flaky_tests: u64,
}

impl SummaryRow {
    pub fn new(stamp: &RunStamp, a: &RunAggregate) -> Self {
        Self {
            commit_hash: stamp.commit_hash.clone(),
            date: stamp.date.clone(),
            total_tests: a.total_tests,
            passed: a.passed,
            failed: a.failed,
            broken: a.broken,
            skipped: a.skipped,
            unknown: a.unknown,
            pass_rate: a.pass_rate,
            total_duration_ms: a.total_duration_ms,
            avg_duration_ms: a.avg_duration_ms,
            min_duration_ms: a.min_duration_ms,
            max_duration_ms: a.max_duration_ms,
            total_retries: a.total_retries,
            flaky_tests: a.flaky_tests,
        }
    }

    /// Fields in `SUMMARY_COLUMNS` order.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.commit_hash.clone(),
            self.date.clone(),
            self.total_tests.to_string(),
            self.passed.to_string(),
            self.failed.to_string(),
            self.broken.to_string(),
            self.skipped.to_string(),
            self.unknown.to_string(),
            format_float(self.pass_rate),
            self.total_duration_ms.to_string(),
            format_float(self.avg_duration_ms),
            self.min_duration_ms.to_string(),
            self.max_duration_ms.to_string(),
            self.total_retries.to_string(),
            self.flaky_tests.to_string(),
        ]
    }
}

/// One line of `performance_metrics.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub commit_hash: String,
    pub date: String,
    pub test_name: String,
    // Kept as text: older rows may carry statuses outside the known set.
    pub status: String,
    pub min_time: f64,
    pub max_time: f64,
    pub avg_time: f64,
    pub run_count: u64,
    pub all_runs: String,
}

impl PerformanceRow {
    pub fn new(stamp: &RunStamp, sample: &PerformanceSample) -> Self {
        let timing = &sample.timing;
        Self {
            commit_hash: stamp.commit_hash.clone(),
            date: stamp.date.clone(),
            test_name: sample.test_name.clone(),
            status: sample.status.as_str().to_string(),
            min_time: timing.min_time,
            max_time: timing.max_time,
            avg_time: timing.avg_time,
            run_count: timing.run_count() as u64,
            all_runs: join_runs(&timing.runs),
        }
    }

    /// Fields in `PERFORMANCE_COLUMNS` order.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.commit_hash.clone(),
            self.date.clone(),
            self.test_name.clone(),
            self.status.clone(),
            format_float(self.min_time),
            format_float(self.max_time),
            format_float(self.avg_time),
            self.run_count.to_string(),
            self.all_runs.clone(),
        ]
    }
}

/// Comma-joined samples in input order.
pub fn join_runs(runs: &[f64]) -> String {
    runs.iter()
        .map(|v| format_float(*v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Shortest round-trip form, always with a fractional part for integral
/// values (`2.0`, not `2`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TestStatus, TimingSummary};

    fn stamp() -> RunStamp {
        RunStamp::new("a1b2c3d", "2024-12-19T14:30:45").unwrap()
    }

    #[test]
    fn floats_keep_a_fractional_digit() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(100.0), "100.0");
        assert_eq!(format_float(66.67), "66.67");
        assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn performance_record_layout() {
        let sample = PerformanceSample {
            test_name: "test_swap_loading_time".into(),
            status: TestStatus::Failed,
            timing: TimingSummary {
                min_time: 1.2,
                max_time: 3.0,
                avg_time: 2.1,
                runs: vec![1.2, 3.0],
            },
        };
        let row = PerformanceRow::new(&stamp(), &sample);
        assert_eq!(
            row.to_record(),
            [
                "a1b2c3d",
                "2024-12-19T14:30:45",
                "test_swap_loading_time",
                "failed",
                "1.2",
                "3.0",
                "2.1",
                "2",
                "1.2,3.0"
            ]
        );
        assert_eq!(row.to_record().len(), PERFORMANCE_COLUMNS.len());
    }

    #[test]
    fn summary_record_matches_column_count() {
        let aggregate = RunAggregate {
            total_tests: 2,
            passed: 1,
            failed: 1,
            broken: 0,
            skipped: 0,
            unknown: 0,
            pass_rate: 50.0,
            total_duration_ms: 400,
            avg_duration_ms: 200.0,
            min_duration_ms: 100,
            max_duration_ms: 300,
            total_retries: 0,
            flaky_tests: 0,
        };
        let record = SummaryRow::new(&stamp(), &aggregate).to_record();
        assert_eq!(record.len(), SUMMARY_COLUMNS.len());
        assert_eq!(record[8], "50.0");
        assert_eq!(record[10], "200.0");
        assert_eq!(record[11], "100");
    }
}
