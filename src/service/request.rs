//! Request and response shapes shared by the HTTP and CLI front-ends

use crate::diagnostics::Diagnostics;
use serde::{Deserialize, Serialize, Serializer};

/// An incoming collection request
///
/// `site` is accepted as an alias of `source` for older callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScrapeRequest {
    #[serde(alias = "site")]
    pub source: Option<String>,

    pub query: Option<String>,

    pub limit: Option<usize>,
}

/// How a response should be classified by transports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    /// The run finished but produced nothing
    NoData,
    InvalidRequest,
    UnknownSource,
    Failed,
}

/// Definitive outcome of one collection request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResponse {
    pub success: bool,

    pub count: usize,

    /// Location of the written table, an empty string when nothing was written
    #[serde(serialize_with = "file_or_empty")]
    pub file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Explanation attached to a partial result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub diagnostics: Diagnostics,

    #[serde(skip)]
    pub status: ResponseStatus,
}

fn file_or_empty<S: Serializer>(file: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(file.as_deref().unwrap_or(""))
}

impl RunResponse {
    pub fn succeeded(count: usize, file: String, diagnostics: Diagnostics) -> Self {
        Self {
            success: true,
            count,
            file: Some(file),
            error: None,
            note: None,
            diagnostics,
            status: ResponseStatus::Ok,
        }
    }

    pub fn failed(status: ResponseStatus, error: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self {
            success: false,
            count: 0,
            file: None,
            error: Some(error.into()),
            note: None,
            diagnostics,
            status,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
