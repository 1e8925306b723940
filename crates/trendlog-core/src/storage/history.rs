//! Reading the accumulated logs back, oldest run first.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::errors::IngestError;
use crate::model::RUN_DATE_FORMAT;

use super::log::{PERFORMANCE_FILE, SUMMARY_FILE};
use super::rows::{PerformanceRow, SummaryRow};

trait Dated {
    fn date(&self) -> &str;
}

impl Dated for SummaryRow {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for PerformanceRow {
    fn date(&self) -> &str {
        &self.date
    }
}

/// Loads `summary_metrics.csv`. The file must exist.
pub fn load_summary_history(data_dir: &Path) -> Result<Vec<SummaryRow>, IngestError> {
    let path = data_dir.join(SUMMARY_FILE);
    if !path.exists() {
        return Err(IngestError::io(
            &path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "summary log not found"),
        ));
    }
    read_sorted(&path)
}

/// Loads `performance_metrics.csv`, or `None` when no performance run was logged yet.
pub fn load_performance_history(
    data_dir: &Path,
) -> Result<Option<Vec<PerformanceRow>>, IngestError> {
    let path = data_dir.join(PERFORMANCE_FILE);
    if !path.exists() {
        return Ok(None);
    }
    read_sorted(&path).map(Some)
}

/// Rows sorted by run date. Same-date rows keep their append order; rows
/// that fail to decode or carry an unparseable date are skipped.
fn read_sorted<T>(path: &Path) -> Result<Vec<T>, IngestError>
where
    T: DeserializeOwned + Dated,
{
    let mut reader = csv::Reader::from_path(path).map_err(|e| IngestError::csv(path, e))?;

    let mut rows: Vec<(NaiveDateTime, T)> = Vec::new();
    for (idx, record) in reader.deserialize::<T>().enumerate() {
        // +2: one-based, after the header line
        let line = idx + 2;
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                warn!(path = %path.display(), line, error = %e, "skipping malformed log row");
                continue;
            }
        };
        match NaiveDateTime::parse_from_str(row.date(), RUN_DATE_FORMAT) {
            Ok(date) => rows.push((date, row)),
            Err(_) => {
                warn!(
                    path = %path.display(),
                    line,
                    date = row.date(),
                    "skipping row with invalid date"
                );
            }
        }
    }

    rows.sort_by_key(|(date, _)| *date);
    Ok(rows.into_iter().map(|(_, row)| row).collect())
}
