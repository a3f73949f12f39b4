//! Core data types shared by sources, the collection loop and sinks

use serde_json::Value;
use std::path::PathBuf;

/// A normalized record: an ordered mapping of field names to text values
///
/// Field order is the order in which the extractor produced them, which is
/// also the column order of the output table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from `(name, value)` pairs
    ///
    /// A repeated name overwrites the earlier value and keeps its position.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (name, value) in pairs {
            record.set(name, value);
        }
        record
    }

    /// Sets a field, replacing any existing value with the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Returns the value of a field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over `(name, value)` pairs in field order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Projects the record onto a column list; missing columns become empty
    pub fn values_for<'a>(&'a self, columns: &[String]) -> Vec<&'a str> {
        columns
            .iter()
            .map(|column| self.get(column).unwrap_or(""))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One entry of a feed as exposed by the current view
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    /// Cheap identity (URL, anchor, or position) used to skip items that were
    /// already processed before running the extractor
    pub handle: String,

    /// Source payload the extractor reads fields from
    pub payload: Value,
}

impl RawItem {
    pub fn new(handle: impl Into<String>, payload: Value) -> Self {
        Self {
            handle: handle.into(),
            payload,
        }
    }
}

/// A single collection request, immutable for the duration of the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Registered source identifier
    pub source: String,

    /// Free-text search query
    pub query: String,

    /// Stop once this many unique records were accepted
    pub target: Option<usize>,

    /// Where the result table is written
    pub output: PathBuf,
}
