//! Ingest configuration.
//!
//! Everything has a built-in default matching the layout produced by the
//! test harness, so a config file is only needed to deviate from it.

use std::path::Path;

use serde::Deserialize;

use crate::errors::IngestError;

pub const DEFAULT_RECORDS_DIR: &str = "test-cases";
pub const DEFAULT_ATTACHMENTS_DIR: &str = "attachments";
pub const DEFAULT_ATTACHMENT_NAME_CONTAINS: &str = "load time";
pub const DEFAULT_PERFORMANCE_TESTS: [&str; 2] =
    ["test_swap_loading_time", "test_wallet_loading_time"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Subdirectory of the run directory holding one JSON record per test.
    pub records_dir: String,
    /// Subdirectory of the run directory holding attachment payloads.
    pub attachments_dir: String,
    /// A test is a performance test if its name contains any of these.
    pub performance_tests: Vec<String>,
    /// Case-insensitive needle matched against attachment display names.
    pub attachment_name_contains: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            records_dir: DEFAULT_RECORDS_DIR.to_string(),
            attachments_dir: DEFAULT_ATTACHMENTS_DIR.to_string(),
            performance_tests: DEFAULT_PERFORMANCE_TESTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            attachment_name_contains: DEFAULT_ATTACHMENT_NAME_CONTAINS.to_string(),
        }
    }
}

impl IngestConfig {
    #[must_use]
    pub fn is_performance_test(&self, test_name: &str) -> bool {
        self.performance_tests
            .iter()
            .any(|marker| !marker.is_empty() && test_name.contains(marker.as_str()))
    }

    fn validate(self, path: &Path) -> Result<Self, IngestError> {
        let invalid = |message: &str| IngestError::Config {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        if self.records_dir.trim().is_empty() {
            return Err(invalid("records_dir must not be empty"));
        }
        if self.attachments_dir.trim().is_empty() {
            return Err(invalid("attachments_dir must not be empty"));
        }
        if self.attachment_name_contains.trim().is_empty() {
            return Err(invalid("attachment_name_contains must not be empty"));
        }
        Ok(self)
    }
}

/// Loads a YAML config file. Keys that are not set keep their defaults.
pub fn load_config(path: &Path) -> Result<IngestConfig, IngestError> {
    let raw = std::fs::read_to_string(path).map_err(|e| IngestError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if raw.trim().is_empty() {
        return Ok(IngestConfig::default());
    }
    let cfg: IngestConfig = serde_yaml::from_str(&raw).map_err(|e| IngestError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    cfg.validate(path)
}
