//! Extracts status and load-time metrics from a test run's result records and
//! appends them to append-only CSV history logs.

pub mod aggregate;
pub mod attachment;
pub mod config;
pub mod errors;
pub mod model;
pub mod pipeline;
pub mod record;
pub mod storage;

pub use aggregate::{RunAggregate, RunAggregator, RunSummary};
pub use config::{load_config, IngestConfig};
pub use errors::{ErrorKind, IngestError, RecordError};
pub use model::{PerformanceSample, RunStamp, TestOutcome, TestStatus, TimingSummary};
pub use pipeline::{collect_run, ingest_run, IngestReport};
