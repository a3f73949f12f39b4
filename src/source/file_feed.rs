//! Local JSON fixture feed
//!
//! Replays a recorded feed page by page. The fixture layout is
//!
//! ```json
//! { "pages": [[{ "Name": "..." }, ...], [...]] }
//! ```
//!
//! The first page is visible when the view opens; each advance reveals one
//! more page. Advancing past the last page changes nothing, so the loop sees
//! a stall.

use crate::model::RawItem;
use crate::source::extractor::to_raw_item;
use crate::source::traits::{FeedSource, FeedView};
use crate::{SourceError, SourceResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct Fixture {
    pages: Vec<Vec<Value>>,
}

/// Feed source backed by a JSON fixture file
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
    handle_field: Option<String>,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>, handle_field: Option<String>) -> Self {
        Self {
            path: path.into(),
            handle_field,
        }
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    async fn open(&self, query: &str) -> SourceResult<Box<dyn FeedView>> {
        tracing::debug!("Opening fixture {} for '{}'", self.path.display(), query);
        let content = tokio::fs::read_to_string(&self.path).await?;
        let fixture: Fixture =
            serde_json::from_str(&content).map_err(|e| SourceError::Decode {
                origin: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut position = 0;
        let mut pages: Vec<Vec<RawItem>> = Vec::with_capacity(fixture.pages.len());
        for page in fixture.pages {
            let mut items = Vec::with_capacity(page.len());
            for payload in page {
                items.push(to_raw_item(payload, self.handle_field.as_deref(), position));
                position += 1;
            }
            pages.push(items);
        }

        Ok(Box::new(FileFeedView { pages, revealed: 1 }))
    }
}

struct FileFeedView {
    pages: Vec<Vec<RawItem>>,
    revealed: usize,
}

#[async_trait]
impl FeedView for FileFeedView {
    async fn snapshot(&mut self) -> SourceResult<Vec<RawItem>> {
        Ok(self
            .pages
            .iter()
            .take(self.revealed)
            .flatten()
            .cloned()
            .collect())
    }

    async fn advance(&mut self) -> SourceResult<()> {
        if self.revealed < self.pages.len() {
            self.revealed += 1;
        }
        Ok(())
    }
}
