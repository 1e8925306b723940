//! One invocation: records of a run directory in, two log appends out.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::aggregate::{RunAggregator, RunSummary};
use crate::config::IngestConfig;
use crate::errors::IngestError;
use crate::model::RunStamp;
use crate::record::RecordParser;
use crate::storage::MetricsLog;

/// What an ingest run produced.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub summary: RunSummary,
    /// Record files found in the run directory, parsed or not.
    pub records_found: usize,
    pub summary_path: PathBuf,
    /// `None` when the run had no performance samples.
    pub performance_path: Option<PathBuf>,
}

/// Record files of a run, sorted by path so row order is reproducible.
pub fn discover_records(
    run_dir: &Path,
    config: &IngestConfig,
) -> Result<Vec<PathBuf>, IngestError> {
    let records_dir = run_dir.join(&config.records_dir);
    if !records_dir.is_dir() {
        return Err(IngestError::MissingRecordsDir {
            run_dir: run_dir.to_path_buf(),
            dir_name: config.records_dir.clone(),
        });
    }

    let entries =
        std::fs::read_dir(&records_dir).map_err(|e| IngestError::io(&records_dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| IngestError::io(&records_dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(IngestError::NoRecordFiles { dir: records_dir });
    }
    files.sort();
    Ok(files)
}

/// Parses and aggregates every record without writing anything.
///
/// Malformed records are logged and counted as skipped.
pub fn collect_run(
    run_dir: &Path,
    config: &IngestConfig,
) -> Result<(RunSummary, usize), IngestError> {
    let files = discover_records(run_dir, config)?;
    info!(run_dir = %run_dir.display(), records = files.len(), "processing run");

    let parser = RecordParser::new(config, run_dir);
    let mut aggregator = RunAggregator::new();
    for path in &files {
        match parser.parse_file(path) {
            Ok(record) => aggregator.push_record(record),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unparseable test record");
                aggregator.record_skipped();
            }
        }
    }

    Ok((aggregator.finish()?, files.len()))
}

/// Full pipeline. Nothing is written unless at least one record parsed.
pub fn ingest_run(
    run_dir: &Path,
    data_dir: &Path,
    stamp: &RunStamp,
    config: &IngestConfig,
) -> Result<IngestReport, IngestError> {
    let (summary, records_found) = collect_run(run_dir, config)?;

    let log = MetricsLog::new(data_dir);
    let summary_path = log.append_summary(stamp, &summary.aggregate)?;
    let performance_path = log.append_performance(stamp, &summary.performance)?;

    info!(
        commit = %stamp.commit_hash,
        date = %stamp.date,
        tests = summary.aggregate.total_tests,
        performance_tests = summary.performance.len(),
        skipped = summary.skipped_records,
        "run appended to metrics logs"
    );

    Ok(IngestReport {
        summary,
        records_found,
        summary_path,
        performance_path,
    })
}
