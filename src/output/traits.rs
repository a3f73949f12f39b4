//! Result sink trait and errors
//!
//! A sink persists the final ordered record set of one run. It is invoked
//! exactly once per run, after the collection loop has finished.

use crate::model::Record;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Output file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output file is empty: {0}")]
    Empty(PathBuf),

    #[error("Invalid file name: {0}")]
    InvalidName(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for result sinks
pub trait ResultSink: Send + Sync {
    /// Writes a header row followed by one row per record
    ///
    /// # Arguments
    ///
    /// * `path` - Destination file; must not exist yet
    /// * `columns` - Header row and column order
    /// * `records` - Rows, in order
    ///
    /// # Returns
    ///
    /// The number of data rows written
    fn write(&self, path: &Path, columns: &[String], records: &[Record]) -> OutputResult<usize>;
}
