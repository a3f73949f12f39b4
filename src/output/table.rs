//! Reading written result tables back for previews

use crate::output::traits::{OutputError, OutputResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A result table as headers plus string rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Loads a CSV result table
///
/// # Arguments
///
/// * `path` - The CSV file
/// * `max_rows` - Maximum number of data rows to return (all if `None`)
pub fn load_table(path: &Path, max_rows: Option<usize>) -> OutputResult<Table> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(OutputError::Empty(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        if max_rows.map_or(false, |max| rows.len() >= max) {
            break;
        }
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { headers, rows })
}

/// Resolves a bare file name inside the output directory
///
/// Rejects anything that could escape the directory.
pub fn resolve_output_file(directory: &Path, file_name: &str) -> OutputResult<PathBuf> {
    let valid = !file_name.is_empty()
        && file_name != "."
        && file_name != ".."
        && !file_name.contains(|c| c == '/' || c == '\\')
        && !file_name.contains("..");

    if !valid {
        return Err(OutputError::InvalidName(file_name.to_string()));
    }

    Ok(directory.join(file_name))
}
