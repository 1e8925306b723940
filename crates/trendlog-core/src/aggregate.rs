//! Run-level aggregation of test outcomes.

use serde::Serialize;

use crate::errors::IngestError;
use crate::model::{PerformanceSample, TestOutcome, TestStatus};
use crate::record::ParsedRecord;

/// Summary statistics for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunAggregate {
    pub total_tests: u64,
    pub passed: u64,
    pub failed: u64,
    pub broken: u64,
    pub skipped: u64,
    pub unknown: u64,
    /// Percentage of passed tests, rounded to two decimals.
    pub pass_rate: f64,
    pub total_duration_ms: u64,
    /// Rounded to two decimals.
    pub avg_duration_ms: f64,
    /// 0 when no test was folded.
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    pub total_retries: u64,
    pub flaky_tests: u64,
}

impl RunAggregate {
    pub fn count(&self, status: TestStatus) -> u64 {
        match status {
            TestStatus::Passed => self.passed,
            TestStatus::Failed => self.failed,
            TestStatus::Broken => self.broken,
            TestStatus::Skipped => self.skipped,
            TestStatus::Unknown => self.unknown,
        }
    }
}

/// Finalized output of a run: the aggregate plus collected performance samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub aggregate: RunAggregate,
    /// In the order the records were folded.
    pub performance: Vec<PerformanceSample>,
    /// Records that failed to parse and were left out of the aggregate.
    pub skipped_records: usize,
}

/// Online fold over the outcomes of one run.
#[derive(Debug, Default)]
pub struct RunAggregator {
    total_tests: u64,
    status_counts: [u64; 5],
    total_duration_ms: u64,
    min_duration_ms: Option<u64>,
    max_duration_ms: u64,
    total_retries: u64,
    flaky_tests: u64,
    performance: Vec<PerformanceSample>,
    skipped_records: usize,
}

impl RunAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: &TestOutcome) {
        self.total_tests += 1;
        self.status_counts[outcome.status as usize] += 1;
        self.total_duration_ms = self.total_duration_ms.saturating_add(outcome.duration_ms);
        self.min_duration_ms = Some(
            self.min_duration_ms
                .map_or(outcome.duration_ms, |min| min.min(outcome.duration_ms)),
        );
        self.max_duration_ms = self.max_duration_ms.max(outcome.duration_ms);
        self.total_retries = self.total_retries.saturating_add(outcome.retries_count);
        if outcome.flaky {
            self.flaky_tests += 1;
        }
    }

    pub fn push_record(&mut self, record: ParsedRecord) {
        self.push(&record.outcome);
        if let Some(sample) = record.performance {
            self.performance.push(sample);
        }
    }

    /// Counts a record that could not be parsed.
    pub fn record_skipped(&mut self) {
        self.skipped_records += 1;
    }

    /// Derived view of the current state. Valid for an empty fold too.
    #[must_use]
    pub fn aggregate(&self) -> RunAggregate {
        let count = |status: TestStatus| self.status_counts[status as usize];
        let (pass_rate, avg_duration_ms) = if self.total_tests == 0 {
            (0.0, 0.0)
        } else {
            let total = self.total_tests as f64;
            (
                round2(count(TestStatus::Passed) as f64 / total * 100.0),
                round2(self.total_duration_ms as f64 / total),
            )
        };

        RunAggregate {
            total_tests: self.total_tests,
            passed: count(TestStatus::Passed),
            failed: count(TestStatus::Failed),
            broken: count(TestStatus::Broken),
            skipped: count(TestStatus::Skipped),
            unknown: count(TestStatus::Unknown),
            pass_rate,
            total_duration_ms: self.total_duration_ms,
            avg_duration_ms,
            min_duration_ms: self.min_duration_ms.unwrap_or(0),
            max_duration_ms: self.max_duration_ms,
            total_retries: self.total_retries,
            flaky_tests: self.flaky_tests,
        }
    }

    /// Finalizes the run. A run without a single folded outcome has no data
    /// worth persisting.
    pub fn finish(self) -> Result<RunSummary, IngestError> {
        if self.total_tests == 0 {
            return Err(IngestError::NoTestResults {
                skipped: self.skipped_records,
            });
        }
        Ok(RunSummary {
            aggregate: self.aggregate(),
            performance: self.performance,
            skipped_records: self.skipped_records,
        })
    }
}

/// Two-decimal rounding of the exact binary value, ties to even.
///
/// A value lies exactly halfway between two hundredths only when it is an odd
/// multiple of 1/8; everything else is rounded through the exact decimal
/// expansion, so `1.005` (stored just below) stays `1.0`.
fn round2(value: f64) -> f64 {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        return (value * 100.0).round_ties_even() / 100.0;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}
