//! Ingest command arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Clone, Debug)]
pub struct IngestArgs {
    /// Run directory containing test-cases/ and attachments/
    pub run_dir: PathBuf,

    /// Git commit hash the run was built from (e.g. a1b2c3d)
    #[arg(long, env = "TRENDLOG_COMMIT_HASH")]
    pub commit_hash: String,

    /// Run datetime in YYYY-MM-DDTHH:MM:SS format (e.g. 2024-12-19T14:30:45)
    #[arg(long, env = "TRENDLOG_DATE")]
    pub date: String,

    /// Directory holding summary_metrics.csv and performance_metrics.csv
    #[arg(long, default_value = "data", env = "TRENDLOG_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Optional YAML file overriding directory names and performance-test markers
    #[arg(long)]
    pub config: Option<PathBuf>,
}
