use serde::{Deserialize, Serialize};

use crate::errors::IngestError;

/// Date format accepted for a run stamp, e.g. `2024-12-19T14:30:45`.
pub const RUN_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Broken,
    Skipped,
    Unknown,
}

impl TestStatus {
    /// Column order used by the summary log.
    pub const ALL: [TestStatus; 5] = [
        TestStatus::Passed,
        TestStatus::Failed,
        TestStatus::Broken,
        TestStatus::Skipped,
        TestStatus::Unknown,
    ];

    /// Normalizes an upstream status string. Anything unrecognized is `Unknown`.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("passed") => Self::Passed,
            Some("failed") => Self::Failed,
            Some("broken") => Self::Broken,
            Some("skipped") => Self::Skipped,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Broken => "broken",
            Self::Skipped => "skipped",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized outcome of a single test record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub retries_count: u64,
    pub flaky: bool,
}

/// Timing figures scanned out of an attachment, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSummary {
    pub min_time: f64,
    pub max_time: f64,
    pub avg_time: f64,
    /// Samples in the order they appeared. Never empty.
    pub runs: Vec<f64>,
}

impl TimingSummary {
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }
}

/// Load-time metrics for one performance test.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSample {
    pub test_name: String,
    pub status: TestStatus,
    pub timing: TimingSummary,
}

/// Identifies a run in the logs. Both values are supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp {
    pub commit_hash: String,
    pub date: String,
}

impl RunStamp {
    /// Validates the date format and rejects an empty commit hash.
    pub fn new(
        commit_hash: impl Into<String>,
        date: impl Into<String>,
    ) -> Result<Self, IngestError> {
        let commit_hash = commit_hash.into();
        let date = date.into();

        if chrono::NaiveDateTime::parse_from_str(&date, RUN_DATE_FORMAT).is_err() {
            return Err(IngestError::InvalidDate { value: date });
        }
        if commit_hash.trim().is_empty() {
            return Err(IngestError::InvalidArgs {
                message: "commit hash must not be empty".to_string(),
            });
        }

        Ok(Self { commit_hash, date })
    }
}
