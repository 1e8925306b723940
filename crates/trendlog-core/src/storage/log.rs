//! Append-only CSV logs.
//!
//! The header is written only when a file is created; an existing file is
//! never read, rewritten or deduplicated. All rows destined for one file are
//! encoded first and then appended with a single write, so a concurrent
//! appender cannot split a batch mid-row.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::aggregate::RunAggregate;
use crate::errors::IngestError;
use crate::model::{PerformanceSample, RunStamp};

use super::rows::{PerformanceRow, SummaryRow, PERFORMANCE_COLUMNS, SUMMARY_COLUMNS};

pub const SUMMARY_FILE: &str = "summary_metrics.csv";
pub const PERFORMANCE_FILE: &str = "performance_metrics.csv";

#[derive(Debug, Clone)]
pub struct MetricsLog {
    data_dir: PathBuf,
}

impl MetricsLog {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn summary_path(&self) -> PathBuf {
        self.data_dir.join(SUMMARY_FILE)
    }

    pub fn performance_path(&self) -> PathBuf {
        self.data_dir.join(PERFORMANCE_FILE)
    }

    /// Appends the run's summary row. Returns the log path.
    pub fn append_summary(
        &self,
        stamp: &RunStamp,
        aggregate: &RunAggregate,
    ) -> Result<PathBuf, IngestError> {
        let path = self.summary_path();
        let row = SummaryRow::new(stamp, aggregate).to_record();
        self.append_rows(&path, &SUMMARY_COLUMNS, &[row])?;
        Ok(path)
    }

    /// Appends one row per sample. Does not touch the file when `samples` is empty.
    pub fn append_performance(
        &self,
        stamp: &RunStamp,
        samples: &[PerformanceSample],
    ) -> Result<Option<PathBuf>, IngestError> {
        if samples.is_empty() {
            return Ok(None);
        }
        let path = self.performance_path();
        let rows: Vec<_> = samples
            .iter()
            .map(|s| PerformanceRow::new(stamp, s).to_record())
            .collect();
        self.append_rows(&path, &PERFORMANCE_COLUMNS, &rows)?;
        Ok(Some(path))
    }

    fn append_rows(
        &self,
        path: &Path,
        header: &[&str],
        rows: &[Vec<String>],
    ) -> Result<(), IngestError> {
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| IngestError::io(&self.data_dir, e))?;

        let write_header = !path.exists();
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());
        if write_header {
            wtr.write_record(header)
                .map_err(|e| IngestError::csv(path, e))?;
        }
        for row in rows {
            wtr.write_record(row).map_err(|e| IngestError::csv(path, e))?;
        }
        let buf = wtr
            .into_inner()
            .map_err(|e| IngestError::io(path, e.into_error()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| IngestError::io(path, e))?;
        file.write_all(&buf).map_err(|e| IngestError::io(path, e))?;

        debug!(path = %path.display(), rows = rows.len(), header = write_header, "appended rows");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TestStatus, TimingSummary};

    fn stamp(date: &str) -> RunStamp {
        RunStamp::new("a1b2c3d", date).unwrap()
    }

    fn aggregate() -> RunAggregate {
        RunAggregate {
            total_tests: 3,
            passed: 2,
            failed: 1,
            broken: 0,
            skipped: 0,
            unknown: 0,
            pass_rate: 66.67,
            total_duration_ms: 900,
            avg_duration_ms: 300.0,
            min_duration_ms: 100,
            max_duration_ms: 500,
            total_retries: 1,
            flaky_tests: 0,
        }
    }

    fn sample(name: &str) -> PerformanceSample {
        PerformanceSample {
            test_name: name.into(),
            status: TestStatus::Passed,
            timing: TimingSummary {
                min_time: 1.2,
                max_time: 3.4,
                avg_time: 2.5,
                runs: vec![1.2, 3.4],
            },
        }
    }

    fn lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn header_written_once_rows_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetricsLog::new(dir.path().join("data"));

        let path = log
            .append_summary(&stamp("2024-12-19T14:30:45"), &aggregate())
            .unwrap();
        let first = lines(&path);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0], SUMMARY_COLUMNS.join(","));
        assert_eq!(
            first[1],
            "a1b2c3d,2024-12-19T14:30:45,3,2,1,0,0,0,66.67,900,300.0,100,500,1,0"
        );

        log.append_summary(&stamp("2024-12-20T09:00:00"), &aggregate())
            .unwrap();
        let second = lines(&path);
        assert_eq!(second.len(), 3);
        assert_eq!(second[..2], first[..]);
        assert!(second[2].starts_with("a1b2c3d,2024-12-20T09:00:00,"));
    }

    #[test]
    fn identical_runs_are_not_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetricsLog::new(dir.path());
        let s = stamp("2024-12-19T14:30:45");

        log.append_summary(&s, &aggregate()).unwrap();
        log.append_summary(&s, &aggregate()).unwrap();
        let rows = lines(&log.summary_path());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], rows[2]);
    }

    #[test]
    fn existing_file_is_appended_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetricsLog::new(dir.path());
        std::fs::write(log.summary_path(), "legacy,content\r\n").unwrap();

        log.append_summary(&stamp("2024-12-19T14:30:45"), &aggregate())
            .unwrap();
        let rows = lines(&log.summary_path());
        assert_eq!(rows[0], "legacy,content");
        assert_eq!(rows.len(), 2);
        assert!(rows[1].starts_with("a1b2c3d,"));
    }

    #[test]
    fn performance_rows_quote_joined_runs() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetricsLog::new(dir.path());
        let s = stamp("2024-12-19T14:30:45");

        let path = log
            .append_performance(
                &s,
                &[sample("test_swap_loading_time"), sample("test_wallet_loading_time")],
            )
            .unwrap()
            .expect("performance log written");
        let rows = lines(&path);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], PERFORMANCE_COLUMNS.join(","));
        assert_eq!(
            rows[1],
            "a1b2c3d,2024-12-19T14:30:45,test_swap_loading_time,passed,1.2,3.4,2.5,2,\"1.2,3.4\""
        );

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with("\r\n"));
    }

    #[test]
    fn no_samples_leaves_performance_log_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let log = MetricsLog::new(&data_dir);
        let written = log
            .append_performance(&stamp("2024-12-19T14:30:45"), &[])
            .unwrap();
        assert!(written.is_none());
        assert!(!log.performance_path().exists());
        assert!(!data_dir.exists());
    }
}
