mod history;
mod log;
mod rows;

pub use history::{load_performance_history, load_summary_history};
pub use log::{MetricsLog, PERFORMANCE_FILE, SUMMARY_FILE};
pub use rows::{
    format_float, join_runs, PerformanceRow, SummaryRow, PERFORMANCE_COLUMNS, SUMMARY_COLUMNS,
};
