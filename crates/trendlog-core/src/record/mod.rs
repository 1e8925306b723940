//! Per-test record decoding.

pub mod schema;

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::attachment::read_timing_attachment;
use crate::config::IngestConfig;
use crate::errors::RecordError;
use crate::model::{PerformanceSample, TestOutcome, TestStatus};

pub use schema::RawTestCase;

/// Result of decoding one record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub outcome: TestOutcome,
    /// Present only for performance tests with a readable timing attachment.
    pub performance: Option<PerformanceSample>,
}

/// Decodes records of a single run directory.
pub struct RecordParser<'a> {
    config: &'a IngestConfig,
    attachments_dir: PathBuf,
}

impl<'a> RecordParser<'a> {
    pub fn new(config: &'a IngestConfig, run_dir: &Path) -> Self {
        Self {
            config,
            attachments_dir: run_dir.join(&config.attachments_dir),
        }
    }

    pub fn parse_file(&self, path: &Path) -> Result<ParsedRecord, RecordError> {
        let json = std::fs::read_to_string(path)?;
        self.parse_str(&json)
    }

    pub fn parse_str(&self, json: &str) -> Result<ParsedRecord, RecordError> {
        let raw: RawTestCase = serde_json::from_str(json)?;
        let outcome = decode_outcome(&raw);

        let performance = if self.config.is_performance_test(&outcome.name) {
            self.performance_sample(&raw, &outcome)
        } else {
            None
        };

        Ok(ParsedRecord {
            outcome,
            performance,
        })
    }

    fn performance_sample(
        &self,
        raw: &RawTestCase,
        outcome: &TestOutcome,
    ) -> Option<PerformanceSample> {
        let Some(source) = find_attachment_source(raw, &self.config.attachment_name_contains)
        else {
            debug!(test = %outcome.name, "performance test has no timing attachment");
            return None;
        };
        if !is_plain_file_name(source) {
            warn!(
                test = %outcome.name,
                source,
                "ignoring attachment source outside attachments dir"
            );
            return None;
        }

        let timing = read_timing_attachment(&self.attachments_dir.join(source))?;
        Some(PerformanceSample {
            test_name: outcome.name.clone(),
            status: outcome.status,
            timing,
        })
    }
}

/// Applies the defaulting rules to a decoded record.
#[must_use]
pub fn decode_outcome(raw: &RawTestCase) -> TestOutcome {
    TestOutcome {
        name: raw.name.clone().unwrap_or_default(),
        status: TestStatus::from_raw(raw.status.as_deref()),
        duration_ms: raw.time.as_ref().and_then(|t| t.duration).unwrap_or(0),
        retries_count: raw.retries_count.unwrap_or(0),
        flaky: raw.flaky.unwrap_or(false),
    }
}

/// Source of the first attachment whose name contains `needle`
/// (case-insensitive). Stage-level attachments are searched before the
/// attachments of each step, in step order.
#[must_use]
pub fn find_attachment_source<'r>(raw: &'r RawTestCase, needle: &str) -> Option<&'r str> {
    let stage = raw.test_stage.as_ref()?;
    let needle = needle.to_lowercase();

    let stage_attachments = stage.attachments.iter().flatten();
    let step_attachments = stage
        .steps
        .iter()
        .flatten()
        .flat_map(|step| step.attachments.iter().flatten());

    stage_attachments
        .chain(step_attachments)
        .filter(|a| {
            a.name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .find_map(|a| a.source.as_deref().filter(|s| !s.is_empty()))
}

fn is_plain_file_name(source: &str) -> bool {
    if source.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(source).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
