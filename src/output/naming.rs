//! Output file naming
//!
//! Names follow `{query}_{source}_{ddmmyy_HHMMSS}_{suffix}.csv`, where the
//! query is lower-cased with spaces replaced by underscores and anything
//! outside `[a-z0-9_-]` dropped. The random suffix keeps concurrent runs for
//! the same query apart.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Makes a query safe for use in a file name
pub fn sanitize_query(query: &str) -> String {
    let safe: String = query
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if safe.is_empty() {
        "query".to_string()
    } else {
        safe
    }
}

/// Builds the file name for a run
pub fn output_file_name(query: &str, source: &str, at: DateTime<Local>, suffix: &str) -> String {
    format!(
        "{}_{}_{}_{}.csv",
        sanitize_query(query),
        source,
        at.format("%d%m%y_%H%M%S"),
        suffix
    )
}

/// Builds a fresh output path in `directory` for a run starting now
pub fn output_path(directory: &Path, query: &str, source: &str) -> PathBuf {
    let suffix = Uuid::new_v4().simple().to_string();
    directory.join(output_file_name(query, source, Local::now(), &suffix[..8]))
}
