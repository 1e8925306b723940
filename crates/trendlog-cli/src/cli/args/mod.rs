use clap::{Parser, Subcommand};

pub mod common;
pub mod history;
pub mod ingest;
pub use common::*;
pub use history::*;
pub use ingest::*;

#[derive(Parser)]
#[command(
    name = "trendlog",
    version,
    about = "Append test-run status and load-time metrics to CSV history logs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a run directory and append its metrics to the logs
    Ingest(IngestArgs),
    /// Show the most recent runs recorded in the logs
    History(HistoryArgs),
    Version,
}
