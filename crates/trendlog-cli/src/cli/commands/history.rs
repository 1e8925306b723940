use std::collections::HashSet;

use serde::Serialize;
use trendlog_core::storage::{
    format_float, load_performance_history, load_summary_history, PerformanceRow, SummaryRow,
};

use super::super::args::{HistoryArgs, OutputFormat};
use crate::exit_codes::EXIT_SUCCESS;

#[derive(Debug, Serialize)]
struct HistoryView {
    runs: Vec<SummaryRow>,
    performance: Vec<PerformanceRow>,
}

pub(crate) fn run(args: HistoryArgs) -> anyhow::Result<i32> {
    let summary = load_summary_history(&args.data_dir)?;
    let performance = load_performance_history(&args.data_dir)?.unwrap_or_default();
    let view = select_recent(summary, performance, args.last);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => print!("{}", render_text(&view)),
    }
    Ok(EXIT_SUCCESS)
}

/// Keeps the last `last` runs (all when 0) and the performance rows tagged
/// with one of those runs.
fn select_recent(
    mut runs: Vec<SummaryRow>,
    performance: Vec<PerformanceRow>,
    last: usize,
) -> HistoryView {
    if last > 0 && runs.len() > last {
        runs.drain(..runs.len() - last);
    }
    let performance: Vec<PerformanceRow> = {
        let keys: HashSet<(&str, &str)> = runs
            .iter()
            .map(|r| (r.commit_hash.as_str(), r.date.as_str()))
            .collect();
        performance
            .into_iter()
            .filter(|p| keys.contains(&(p.commit_hash.as_str(), p.date.as_str())))
            .collect()
    };
    HistoryView { runs, performance }
}

fn render_text(view: &HistoryView) -> String {
    let mut out = format!(
        "{:<20} {:<12} {:>6} {:>6} {:>6} {:>9} {:>12} {:>6}\n",
        "date", "commit", "tests", "passed", "failed", "pass_rate", "avg_ms", "flaky"
    );
    for r in &view.runs {
        out.push_str(&format!(
            "{:<20} {:<12} {:>6} {:>6} {:>6} {:>9} {:>12} {:>6}\n",
            r.date,
            short_commit(&r.commit_hash),
            r.total_tests,
            r.passed,
            r.failed,
            format_float(r.pass_rate),
            format_float(r.avg_duration_ms),
            r.flaky_tests
        ));
    }

    if !view.performance.is_empty() {
        out.push_str("\nload times (s)\n");
        for p in &view.performance {
            out.push_str(&format!(
                "{:<20} {:<12} {} [{}] min={} avg={} max={} runs={}\n",
                p.date,
                short_commit(&p.commit_hash),
                p.test_name,
                p.status,
                format_float(p.min_time),
                format_float(p.avg_time),
                format_float(p.max_time),
                p.run_count
            ));
        }
    }
    out
}

fn short_commit(hash: &str) -> &str {
    hash.char_indices().nth(12).map_or(hash, |(idx, _)| &hash[..idx])
}
