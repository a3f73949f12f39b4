//! CSV result sink

use crate::model::Record;
use crate::output::traits::{OutputError, OutputResult, ResultSink};
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

/// Writes runs as UTF-8 CSV with a header row
///
/// Files are created with create-new semantics so two runs can never write
/// into the same file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSink;

impl CsvSink {
    pub fn new() -> Self {
        Self
    }
}

impl ResultSink for CsvSink {
    fn write(&self, path: &Path, columns: &[String], records: &[Record]) -> OutputResult<usize> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => OutputError::AlreadyExists(path.to_path_buf()),
                _ => OutputError::Io(e),
            })?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(columns)?;
        for record in records {
            writer.write_record(record.values_for(columns))?;
        }
        writer.flush()?;

        tracing::info!("Results saved to {} ({} rows)", path.display(), records.len());
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn columns() -> Vec<String> {
        vec!["Name".to_string(), "Address".to_string()]
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let records = vec![
            Record::from_pairs([("Name", "Acme"), ("Address", "1 Main St, Pune")]),
            Record::from_pairs([("Name", "Beta")]),
        ];

        let written = CsvSink::new().write(&path, &columns(), &records).unwrap();

        assert_eq!(written, 2);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Name,Address\nAcme,\"1 Main St, Pune\"\nBeta,\n");
    }

    #[test]
    fn test_empty_run_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");

        let written = CsvSink::new().write(&path, &columns(), &[]).unwrap();

        assert_eq!(written, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Name,Address\n");
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taken.csv");
        std::fs::write(&path, "existing").unwrap();

        let result = CsvSink::new().write(&path, &columns(), &[]);

        assert!(matches!(result, Err(OutputError::AlreadyExists(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");
    }
}
