//! Source-side interfaces
//!
//! The collection loop only talks to a source through `FeedView` and
//! `Extractor`. The front-end only talks to a source through `SourcePlugin`.

use crate::collect::StopReason;
use crate::diagnostics::Diagnostics;
use crate::model::{RawItem, Record};
use crate::output::OutputError;
use crate::{ExtractError, HarvestError, SourceResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A live, stateful view over one growing feed
///
/// One view belongs to exactly one run.
#[async_trait]
pub trait FeedView: Send {
    /// Returns every raw item currently visible
    ///
    /// The result is cumulative: items loaded by earlier advances are included.
    async fn snapshot(&mut self) -> SourceResult<Vec<RawItem>>;

    /// Performs one scroll or pagination step
    ///
    /// An advance that loads nothing new is not an error.
    async fn advance(&mut self) -> SourceResult<()>;
}

/// Turns raw items into records for one source schema
pub trait Extractor: Send + Sync {
    /// Output columns, in order
    fn columns(&self) -> &[String];

    /// Extracts a record from a raw item
    fn extract(&self, item: &RawItem) -> Result<Record, ExtractError>;
}

/// Opens views for queries against one data source
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Opens a fresh view for `query`
    async fn open(&self, query: &str) -> SourceResult<Box<dyn FeedView>>;
}

/// Everything a plugin run produced
#[derive(Debug)]
pub struct PluginOutput {
    /// Written table, `None` when nothing was written
    pub file: Option<PathBuf>,

    /// Accepted records, kept even when writing failed so the caller can retry
    pub records: Vec<Record>,

    /// Column order of `records`
    pub columns: Vec<String>,

    pub stop_reason: StopReason,

    pub reached_target: bool,

    pub diagnostics: Diagnostics,

    /// Set when the sink failed to write the table
    pub write_error: Option<OutputError>,
}

/// A registered data source as seen by the front-end
#[async_trait]
pub trait SourcePlugin: Send + Sync {
    /// Human-readable summary; an empty description marks the source unavailable
    fn description(&self) -> &str;

    /// Collects records for `query` and writes them to `output_path`
    async fn run(
        &self,
        query: &str,
        output_path: &Path,
        limit: Option<usize>,
    ) -> Result<PluginOutput, HarvestError>;
}
