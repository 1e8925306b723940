//! Error types for the ingestion pipeline.
//!
//! [`IngestError`] covers the conditions that abort an invocation before
//! anything is persisted. [`RecordError`] covers a single malformed test
//! record; the pipeline logs it and keeps going.

use std::path::PathBuf;

/// Fatal ingestion errors.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Date argument does not match `YYYY-MM-DDTHH:MM:SS`.
    #[error("date must be in YYYY-MM-DDTHH:MM:SS format, got: {value}")]
    InvalidDate { value: String },

    /// Any other invalid invocation parameter.
    #[error("invalid arguments: {message}")]
    InvalidArgs { message: String },

    /// The run directory has no record subdirectory.
    #[error("{dir_name} directory not found in {}", run_dir.display())]
    MissingRecordsDir { run_dir: PathBuf, dir_name: String },

    /// The record subdirectory exists but holds no `*.json` files.
    #[error("no JSON files found in {}", dir.display())]
    NoRecordFiles { dir: PathBuf },

    /// Every record failed to parse, so there is nothing to aggregate.
    #[error("no test results found ({skipped} record(s) skipped)")]
    NoTestResults { skipped: usize },

    /// Config file could not be read or decoded.
    #[error("configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// Filesystem failure while reading inputs or appending to a log.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encode/decode failure.
    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl IngestError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Broad cause, used by the CLI to pick an exit code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRecordsDir { .. }
            | Self::NoRecordFiles { .. }
            | Self::NoTestResults { .. } => ErrorKind::Input,

            Self::InvalidDate { .. } | Self::InvalidArgs { .. } | Self::Config { .. } => {
                ErrorKind::Config
            }

            Self::Io { .. } | Self::Csv { .. } => ErrorKind::Io,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The run directory holds nothing usable.
    Input,
    /// Invocation parameters or config file.
    Config,
    /// Reading inputs or persisting logs.
    Io,
}

/// Failure to decode one test record. Recoverable.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("failed to read record: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
