use std::path::Path;

use trendlog_core::storage::format_float;
use trendlog_core::{ingest_run, load_config, IngestConfig, IngestReport, RunStamp};

use super::super::args::IngestArgs;
use crate::exit_codes::EXIT_SUCCESS;

pub(crate) fn run(args: IngestArgs) -> anyhow::Result<i32> {
    // Date and commit are checked before the run directory is touched.
    let stamp = RunStamp::new(&args.commit_hash, &args.date)?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => IngestConfig::default(),
    };
    tracing::debug!(?config, "ingest configuration");

    println!("Processing run: {}", args.run_dir.display());
    let report = ingest_run(&args.run_dir, &args.data_dir, &stamp, &config)?;
    print!("{}", render_report(&report, &args.data_dir));
    Ok(EXIT_SUCCESS)
}

fn render_report(report: &IngestReport, data_dir: &Path) -> String {
    let aggregate = &report.summary.aggregate;
    let mut out = format!("Found {} test case files\n", report.records_found);
    if report.summary.skipped_records > 0 {
        out.push_str(&format!(
            "Skipped {} unparseable record(s)\n",
            report.summary.skipped_records
        ));
    }
    out.push_str(&format!("Processed {} tests\n", aggregate.total_tests));
    if !report.summary.performance.is_empty() {
        out.push_str(&format!(
            "Processed {} performance tests\n",
            report.summary.performance.len()
        ));
    }
    out.push_str(&format!("Pass rate: {}%\n", format_float(aggregate.pass_rate)));
    out.push_str(&format!(
        "Total duration: {}ms\n",
        aggregate.total_duration_ms
    ));

    let shown = std::path::absolute(data_dir).unwrap_or_else(|_| data_dir.to_path_buf());
    out.push_str(&format!("\nCSV files updated in {}\n", shown.display()));
    out
}
