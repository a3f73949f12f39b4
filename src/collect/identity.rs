//! Identity keys and duplicate tracking
//!
//! Records coming from different scroll batches are compared by a normalized
//! tuple of designated fields. Normalization lower-cases each value, trims it,
//! and collapses internal whitespace runs to a single space.
//!
//! A record whose key fields are all empty still gets a key (the all-empty
//! tuple) and is deduplicated like any other, so at most one wholly-empty
//! record survives a run.

use crate::model::Record;
use std::collections::HashSet;
use std::fmt;

/// Normalized tuple of key field values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(Vec<String>);

impl IdentityKey {
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// True when every component is empty
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(" | "))
    }
}

/// Normalizes a single field value for comparison
pub fn normalize_value(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derives the identity key of a record from the designated fields
///
/// Missing fields contribute an empty component.
pub fn normalize(record: &Record, key_fields: &[String]) -> IdentityKey {
    IdentityKey(
        key_fields
            .iter()
            .map(|field| normalize_value(record.get(field).unwrap_or("")))
            .collect(),
    )
}

/// Set of identity keys seen during one run
///
/// The set only grows; there is no way to forget a key mid-run.
#[derive(Debug, Clone)]
pub struct IdentityTracker {
    key_fields: Vec<String>,
    seen: HashSet<IdentityKey>,
}

impl IdentityTracker {
    pub fn new(key_fields: Vec<String>) -> Self {
        Self {
            key_fields,
            seen: HashSet::new(),
        }
    }

    /// Computes the key of a record using this tracker's key fields
    pub fn key_for(&self, record: &Record) -> IdentityKey {
        normalize(record, &self.key_fields)
    }

    pub fn is_duplicate(&self, key: &IdentityKey) -> bool {
        self.seen.contains(key)
    }

    /// Records a key as seen; returns false if it was already present
    pub fn mark_seen(&mut self, key: IdentityKey) -> bool {
        self.seen.insert(key)
    }

    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
