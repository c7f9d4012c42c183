//! Output module: dataset sinks and the end-of-run summary
//!
//! Both datasets are written twice, as JSON Lines and as CSV. The two sinks
//! are independent; neither reads what the other wrote.

mod csv_sink;
mod jsonl;
mod summary;

pub use csv_sink::{write_csv, CsvSink};
pub use jsonl::{write_jsonl, JsonlSink};
pub use summary::{print_summary, HarvestSummary};

use crate::Record;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A file format a dataset can be written in
pub trait RecordSink {
    /// File extension, without the dot
    fn extension(&self) -> &'static str;

    /// Writes `records` to `path`, replacing any existing file
    fn write(&self, path: &Path, records: &[Record]) -> OutputResult<()>;
}

/// Every sink a dataset is written to, in write order
pub fn default_sinks() -> [&'static dyn RecordSink; 2] {
    [&JsonlSink, &CsvSink]
}
