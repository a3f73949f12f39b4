//! Execution strategy for plugin runs

use crate::model::RunRequest;
use crate::source::{PluginOutput, SourcePlugin};
use crate::HarvestError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

/// Decides where a plugin run executes
#[async_trait]
pub trait ExecutionStrategy: Send + Sync {
    async fn execute(
        &self,
        plugin: Arc<dyn SourcePlugin>,
        request: &RunRequest,
    ) -> Result<PluginOutput, HarvestError>;
}

/// Runs plugins on the calling task
#[derive(Debug, Clone, Copy, Default)]
pub struct InProcess;

#[async_trait]
impl ExecutionStrategy for InProcess {
    async fn execute(
        &self,
        plugin: Arc<dyn SourcePlugin>,
        request: &RunRequest,
    ) -> Result<PluginOutput, HarvestError> {
        let span = tracing::info_span!("run", source = %request.source, query = %request.query);
        plugin
            .run(&request.query, &request.output, request.target)
            .instrument(span)
            .await
    }
}
