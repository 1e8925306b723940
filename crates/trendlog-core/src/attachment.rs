//! Load-time scanning for free-form test attachments.
//!
//! Attachments are plain text written by the test harness, e.g.
//!
//! ```text
//! Run 1 load time: 1.21s
//! Run 2 load time: 1.34s
//! Average load time: 1.28s
//! ```
//!
//! Every line is looked at on its own. Lines that do not yield a number are
//! ignored, so a noisy attachment degrades to fewer samples instead of an error.

use std::path::Path;

use tracing::{debug, warn};

use crate::model::TimingSummary;

const SAMPLE_MARKER: &str = "load time:";
const AVERAGE_KEYWORD: &str = "average";
const AVERAGE_MARKER: &str = "load time";

/// Scans attachment text for load-time samples.
///
/// Returns `None` when no sample line carries a parseable value, even if an
/// average line is present.
#[must_use]
pub fn scan_timing_text(text: &str) -> Option<TimingSummary> {
    let mut runs = Vec::new();
    let mut reported_avg = None;

    for line in text.lines() {
        let lower = line.to_lowercase();
        let mentions_average = lower.contains(AVERAGE_KEYWORD);

        if lower.contains(SAMPLE_MARKER) && !mentions_average {
            if let Some(value) = line
                .split_once(SAMPLE_MARKER)
                .and_then(|(_, rest)| parse_leading_number(rest))
            {
                runs.push(value);
            }
        }

        if mentions_average && lower.contains(AVERAGE_MARKER) {
            if let Some(value) = line
                .split_once(':')
                .and_then(|(_, rest)| parse_leading_number(rest))
            {
                reported_avg = Some(value);
            }
        }
    }

    if runs.is_empty() {
        return None;
    }

    let min_time = runs.iter().copied().fold(f64::INFINITY, f64::min);
    let max_time = runs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg_time =
        reported_avg.unwrap_or_else(|| runs.iter().sum::<f64>() / runs.len() as f64);

    Some(TimingSummary {
        min_time,
        max_time,
        avg_time,
        runs,
    })
}

/// Reads and scans an attachment file. A missing or unreadable file yields `None`.
pub fn read_timing_attachment(path: &Path) -> Option<TimingSummary> {
    match std::fs::read_to_string(path) {
        Ok(text) => scan_timing_text(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "attachment file not found");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read performance attachment");
            None
        }
    }
}

/// First whitespace-delimited token as a finite number. A trailing unit
/// suffix such as `s` or `ms` is dropped before parsing.
fn parse_leading_number(rest: &str) -> Option<f64> {
    let token = rest.split_whitespace().next()?;
    let numeric = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    numeric.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn text_without_samples_is_empty() {
        assert!(scan_timing_text("").is_none());
        assert!(scan_timing_text("page rendered\nall good\n").is_none());
        assert!(scan_timing_text("average load time: 2.5s").is_none());
    }

    #[test]
    fn reported_average_wins_over_mean() {
        let summary =
            scan_timing_text("load time: 1.2s\nload time: 3.4s\naverage load time: 2.5s")
                .unwrap();
        assert_eq!(summary.min_time, 1.2);
        assert_eq!(summary.max_time, 3.4);
        assert_eq!(summary.avg_time, 2.5);
        assert_eq!(summary.run_count(), 2);
        assert_eq!(summary.runs, vec![1.2, 3.4]);
    }

    #[test]
    fn mean_used_without_average_line() {
        let summary = scan_timing_text("load time: 1.2s\nload time: 3.4s").unwrap();
        assert!(approx(summary.avg_time, 2.3));
        assert_eq!(summary.run_count(), 2);
    }

    #[test]
    fn malformed_average_falls_back_to_mean() {
        let text = "load time: 1.0\nload time: 2.0\nAverage load time: n/a";
        let summary = scan_timing_text(text).unwrap();
        assert!(approx(summary.avg_time, 1.5));
    }

    #[test]
    fn malformed_sample_lines_are_skipped() {
        let text = "\
Run 1 load time: 0.8
Run 2 load time: timeout
Run 3 load time:
Run 4 load time: 1.6 seconds (cold cache)
Run 5 load time: NaN";
        let summary = scan_timing_text(text).unwrap();
        assert_eq!(summary.runs, vec![0.8, 1.6]);
        assert_eq!(summary.min_time, 0.8);
        assert_eq!(summary.max_time, 1.6);
    }

    #[test]
    fn detection_is_case_insensitive_but_split_is_exact() {
        // Detected as a sample line, but there is no lowercase marker to split on.
        assert!(scan_timing_text("Load Time: 1.0").is_none());

        let summary = scan_timing_text("Wallet load time: 1.0\nAVERAGE LOAD TIME: 4.0").unwrap();
        assert_eq!(summary.runs, vec![1.0]);
        assert_eq!(summary.avg_time, 4.0);
    }

    #[test]
    fn last_valid_average_line_wins() {
        let text = "load time: 1\naverage load time: 2\naverage load time: 3\naverage load time: ?";
        let summary = scan_timing_text(text).unwrap();
        assert_eq!(summary.avg_time, 3.0);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_timing_attachment(&dir.path().join("nope.txt")).is_none());
    }

    #[test]
    fn reads_attachment_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a1-attachment.txt");
        std::fs::write(&path, "load time: 2.25s\r\nload time: 1.75s\r\n").unwrap();

        let summary = read_timing_attachment(&path).unwrap();
        assert_eq!(summary.runs, vec![2.25, 1.75]);
        assert_eq!(summary.avg_time, 2.0);
    }
}
