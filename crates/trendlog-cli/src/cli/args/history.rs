//! History command arguments.

use std::path::PathBuf;

use clap::Parser;

use super::OutputFormat;

#[derive(Parser, Clone, Debug)]
pub struct HistoryArgs {
    /// Directory holding summary_metrics.csv and performance_metrics.csv
    #[arg(long, default_value = "data", env = "TRENDLOG_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Number of most recent runs to include (0 = all)
    #[arg(long, default_value_t = 10)]
    pub last: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
