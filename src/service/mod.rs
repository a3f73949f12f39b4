//! Orchestration front-end
//!
//! Validates requests, resolves the source, names the output file, runs the
//! plugin through the execution strategy, and turns whatever happened into
//! one definitive `RunResponse`.

mod executor;
mod request;

pub use executor::{ExecutionStrategy, InProcess};
pub use request::{ResponseStatus, RunResponse, ScrapeRequest};

use crate::collect::StopReason;
use crate::diagnostics::Diagnostics;
use crate::model::RunRequest;
use crate::output::naming;
use crate::source::{PluginOutput, SourceInfo, SourceRegistry};
use crate::HarvestError;
use std::path::PathBuf;
use std::sync::Arc;

/// Front-end service shared by the HTTP server and the CLI
#[derive(Clone)]
pub struct HarvestService {
    registry: Arc<SourceRegistry>,
    executor: Arc<dyn ExecutionStrategy>,
    output_dir: PathBuf,
}

impl HarvestService {
    pub fn new(registry: SourceRegistry, output_dir: impl Into<PathBuf>) -> Self {
        Self::with_executor(registry, output_dir, Arc::new(InProcess))
    }

    pub fn with_executor(
        registry: SourceRegistry,
        output_dir: impl Into<PathBuf>,
        executor: Arc<dyn ExecutionStrategy>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            executor,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn list_sources(&self) -> Vec<SourceInfo> {
        self.registry.list()
    }

    /// Runs one collection request to completion
    ///
    /// Never fails: every outcome, including unknown sources and write
    /// failures, is reported in the response.
    pub async fn run_collection(&self, request: ScrapeRequest) -> RunResponse {
        let run = match self.validate(request) {
            Ok(run) => run,
            Err(message) => {
                tracing::warn!("Rejected request: {}", message);
                return RunResponse::failed(
                    ResponseStatus::InvalidRequest,
                    message,
                    Diagnostics::new(),
                );
            }
        };

        let plugin = match self.registry.get(&run.source) {
            Ok(plugin) => plugin,
            Err(e) => {
                tracing::warn!("{}", e);
                return RunResponse::failed(
                    ResponseStatus::UnknownSource,
                    e.to_string(),
                    Diagnostics::new(),
                );
            }
        };

        tracing::info!(
            "Running {} for '{}' into {}",
            run.source,
            run.query,
            run.output.display()
        );

        match self.executor.execute(plugin, &run).await {
            Ok(output) => summarize(&run, output),
            Err(e) => {
                tracing::error!("Run for {} failed: {}", run.source, e);
                let mut diagnostics = Diagnostics::new();
                diagnostics.note(e.to_string());
                RunResponse::failed(status_for(&e), e.to_string(), diagnostics)
            }
        }
    }

    fn validate(&self, request: ScrapeRequest) -> Result<RunRequest, String> {
        let source = request.source.unwrap_or_default().trim().to_string();
        let query = request.query.unwrap_or_default().trim().to_string();

        if source.is_empty() || query.is_empty() {
            return Err("site and query are required".to_string());
        }
        if request.limit == Some(0) {
            return Err("limit must be a positive integer".to_string());
        }

        let output = naming::output_path(&self.output_dir, &query, &source);
        Ok(RunRequest {
            source,
            query,
            target: request.limit,
            output,
        })
    }
}

fn status_for(error: &HarvestError) -> ResponseStatus {
    match error {
        HarvestError::UnknownSource(_) | HarvestError::Unavailable { .. } => {
            ResponseStatus::UnknownSource
        }
        HarvestError::InvalidRequest(_) => ResponseStatus::InvalidRequest,
        _ => ResponseStatus::Failed,
    }
}

/// Maps a finished plugin run to the response
fn summarize(run: &RunRequest, output: PluginOutput) -> RunResponse {
    let count = output.records.len();
    let diagnostics = output.diagnostics;

    if output.stop_reason == StopReason::InitialFailure {
        return RunResponse::failed(
            ResponseStatus::Failed,
            format!("Failed to load results for {}", run.source),
            diagnostics,
        );
    }

    if let Some(e) = output.write_error {
        let mut response = RunResponse::failed(
            ResponseStatus::Failed,
            format!("Failed to write results: {}", e),
            diagnostics,
        );
        response.count = count;
        return response;
    }

    let file = match output.file {
        Some(file) if file.exists() => file,
        _ => {
            tracing::error!("Output file {} not found after run", run.output.display());
            return RunResponse::failed(
                ResponseStatus::Failed,
                "Output file not found.",
                diagnostics,
            );
        }
    };
    let file = file.display().to_string();

    if count == 0 {
        let mut response =
            RunResponse::failed(ResponseStatus::NoData, "No data scraped.", diagnostics);
        response.file = Some(file);
        return response;
    }

    let response = RunResponse::succeeded(count, file, diagnostics);
    match run.target {
        Some(target) if count < target => {
            tracing::info!("Only {} records found out of requested {}", count, target);
            response.with_note(format!(
                "Only {} records found out of requested {}.",
                count, target
            ))
        }
        _ => response,
    }
}
