//! JSON field extraction
//!
//! Maps payload keys to output columns. Columns absent from an item are
//! filled with `N/A`; an item carrying none of the columns is an extraction
//! failure.

use crate::model::{RawItem, Record};
use crate::source::traits::Extractor;
use crate::ExtractError;
use serde_json::Value;

/// Placeholder written for columns an item does not provide
pub const MISSING_VALUE: &str = "N/A";

/// Extracts a fixed column list from JSON object payloads
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    columns: Vec<String>,
}

impl FieldExtractor {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl Extractor for FieldExtractor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn extract(&self, item: &RawItem) -> Result<Record, ExtractError> {
        let object = item
            .payload
            .as_object()
            .ok_or_else(|| ExtractError::NotAnObject {
                handle: item.handle.clone(),
            })?;

        let mut record = Record::new();
        let mut found = 0;

        for column in &self.columns {
            match object.get(column).and_then(value_text) {
                Some(text) => {
                    found += 1;
                    record.set(column.as_str(), text);
                }
                None => record.set(column.as_str(), MISSING_VALUE),
            }
        }

        if found == 0 {
            return Err(ExtractError::NoFields {
                handle: item.handle.clone(),
            });
        }

        Ok(record)
    }
}

/// Renders a JSON value as cell text; `null` counts as absent
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// Wraps a payload into a raw item
///
/// The handle is taken from `handle_field` when the payload carries a
/// non-empty value there, otherwise from the item's position in the feed.
pub fn to_raw_item(payload: Value, handle_field: Option<&str>, position: usize) -> RawItem {
    let handle = handle_field
        .and_then(|field| payload.get(field))
        .and_then(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| format!("#{}", position));

    RawItem::new(handle, payload)
}
