//! Feed plugins - a feed source wired to the collection loop and a sink

use crate::collect::{collect, StopPolicy, StopReason};
use crate::diagnostics::Diagnostics;
use crate::source::extractor::FieldExtractor;
use crate::source::traits::{Extractor, FeedSource, PluginOutput, SourcePlugin};
use crate::output::ResultSink;
use crate::HarvestError;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// A source plugin that harvests a feed and writes the result table
pub struct FeedPlugin {
    id: String,
    description: String,
    source: Box<dyn FeedSource>,
    extractor: FieldExtractor,
    key_fields: Vec<String>,
    policy: StopPolicy,
    sink: Arc<dyn ResultSink>,
}

impl FeedPlugin {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        source: Box<dyn FeedSource>,
        extractor: FieldExtractor,
        key_fields: Vec<String>,
        policy: StopPolicy,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            source,
            extractor,
            key_fields,
            policy,
            sink,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl SourcePlugin for FeedPlugin {
    fn description(&self) -> &str {
        &self.description
    }

    async fn run(
        &self,
        query: &str,
        output_path: &Path,
        limit: Option<usize>,
    ) -> Result<PluginOutput, HarvestError> {
        tracing::info!("Starting {} collection for: {}", self.id, query);
        tracing::info!("Received limit: {:?}", limit);

        let mut view = self.source.open(query).await?;
        let result = collect(
            view.as_mut(),
            &self.extractor,
            self.key_fields.clone(),
            limit,
            self.policy.clone(),
        )
        .await;

        let columns = self.extractor.columns().to_vec();
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(result.diagnostics);

        if result.stop_reason == StopReason::InitialFailure {
            tracing::error!("{}: view could not be loaded, nothing written", self.id);
            return Ok(PluginOutput {
                file: None,
                records: result.records,
                columns,
                stop_reason: result.stop_reason,
                reached_target: false,
                diagnostics,
                write_error: None,
            });
        }

        if result.records.is_empty() {
            tracing::warn!("No data scraped for {}", query);
            diagnostics.note("No records were collected");
        }

        // Sinks do blocking file I/O
        let sink = Arc::clone(&self.sink);
        let path = output_path.to_path_buf();
        let write_columns = columns.clone();
        let records = result.records;
        let (records, written) = tokio::task::spawn_blocking(move || {
            let written = sink.write(&path, &write_columns, &records);
            (records, written)
        })
        .await
        .map_err(|e| HarvestError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

        let (file, write_error) = match written {
            Ok(_) => (Some(output_path.to_path_buf()), None),
            Err(e) => {
                tracing::error!("Failed to write {}: {}", output_path.display(), e);
                diagnostics.note(format!("Failed to write {}: {}", output_path.display(), e));
                (None, Some(e))
            }
        };

        Ok(PluginOutput {
            file,
            records,
            columns,
            stop_reason: result.stop_reason,
            reached_target: result.reached_target,
            diagnostics,
            write_error,
        })
    }
}
