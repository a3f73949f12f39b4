//! Collection loop - drives a feed view until the run should stop
//!
//! Each iteration runs the same fixed sequence:
//! 1. Take the current (cumulative) batch of visible raw items
//! 2. Extract and deduplicate items whose handle was not seen before
//! 3. Stop if the target count is reached
//! 4. Advance the view by one scroll/pagination step and read it again
//! 5. Stop on stall, scroll ceiling, or deadline
//!
//! Growth is judged by comparing the visible count before and after the
//! advance. The post-advance read becomes the next iteration's batch.
//!
//! The loop performs no I/O of its own; all waiting happens inside the view.

use crate::collect::policy::{Budget, StopPolicy};
use crate::collect::state::{CollectionState, StopReason};
use crate::diagnostics::Diagnostics;
use crate::model::{RawItem, Record};
use crate::source::{Extractor, FeedView};
use crate::SourceError;
use std::time::Duration;

/// Final outcome of one collection run
#[derive(Debug, Clone)]
pub struct CollectionResult {
    /// Accepted records in acceptance order
    pub records: Vec<Record>,

    pub reached_target: bool,

    pub stop_reason: StopReason,

    /// Iterations started
    pub iterations: u32,

    /// Successful advance operations
    pub advances: u32,

    pub elapsed: Duration,

    pub diagnostics: Diagnostics,
}

/// One collection loop instance
///
/// A collector owns its state exclusively and is consumed by `run`.
pub struct Collector<'a> {
    extractor: &'a dyn Extractor,
    policy: StopPolicy,
    budget: Budget,
    target: Option<usize>,
    state: CollectionState,
    diagnostics: Diagnostics,
}

impl<'a> Collector<'a> {
    /// Creates a collector for a single run
    ///
    /// # Arguments
    ///
    /// * `extractor` - Source-specific record extractor
    /// * `key_fields` - Fields forming the identity key
    /// * `target` - Stop after this many unique records
    /// * `policy` - Stall threshold and budgets
    pub fn new(
        extractor: &'a dyn Extractor,
        key_fields: Vec<String>,
        target: Option<usize>,
        policy: StopPolicy,
    ) -> Self {
        let budget = policy.budget_for(target);
        Self {
            extractor,
            policy,
            budget,
            target,
            state: CollectionState::new(key_fields),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Runs the loop against `view` until a stop condition fires
    pub async fn run(mut self, view: &mut dyn FeedView) -> CollectionResult {
        tracing::info!(
            "Starting collection (target: {:?}, max advances: {}, time budget: {:?})",
            self.target,
            self.budget.max_advances,
            self.budget.time_budget
        );

        let mut pending: Option<Vec<RawItem>> = None;

        let stop_reason = loop {
            self.state.iterations += 1;
            let iteration = self.state.iterations;

            let batch = match pending.take() {
                Some(batch) => batch,
                None => match view.snapshot().await {
                    Ok(batch) => batch,
                    Err(e) => break self.view_failure(iteration, "read", &e),
                },
            };

            let visible = batch.len();
            let accepted = self.process_batch(batch);
            tracing::debug!(
                "Iteration {}: {} items visible, {} new records, {} total",
                iteration,
                visible,
                accepted,
                self.state.accepted()
            );

            if self
                .policy
                .target_reached(self.target, self.state.accepted())
            {
                tracing::info!("Reached desired limit of {:?}", self.target);
                break StopReason::Target;
            }

            if let Err(e) = view.advance().await {
                break self.view_failure(iteration, "advance", &e);
            }
            self.state.advances += 1;

            let next = match view.snapshot().await {
                Ok(next) => next,
                Err(e) => break self.view_failure(iteration, "read", &e),
            };
            self.state.observe_advance(visible, next.len());
            pending = Some(next);

            if let Some(decision) = self.policy.check_progress(&self.state, &self.budget) {
                tracing::info!("{}", decision.message);
                self.diagnostics.note(decision.message);
                break decision.reason;
            }
        };

        self.finish(stop_reason)
    }

    /// Extracts and deduplicates the items of a batch that were not seen before
    ///
    /// Returns the number of newly accepted records.
    fn process_batch(&mut self, batch: Vec<RawItem>) -> usize {
        let mut accepted = 0;

        for item in batch {
            if self
                .policy
                .target_reached(self.target, self.state.accepted())
            {
                break;
            }

            // Broken items are marked too so they are never retried
            if !self.state.visited_handles.insert(item.handle.clone()) {
                continue;
            }

            let record = match self.extractor.extract(&item) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Failed to extract {}: {}", item.handle, e);
                    self.diagnostics
                        .note(format!("Failed to extract {}: {}", item.handle, e));
                    continue;
                }
            };

            let key = self.state.identities.key_for(&record);
            if self.state.identities.is_duplicate(&key) {
                tracing::trace!("Skipping duplicate {} ({})", item.handle, key);
                continue;
            }

            self.state.identities.mark_seen(key);
            self.state.records.push(record);
            accepted += 1;
        }

        accepted
    }

    /// Classifies a view failure: fatal on the first iteration, a stall afterwards
    fn view_failure(&mut self, iteration: u32, operation: &str, error: &SourceError) -> StopReason {
        if iteration == 1 {
            tracing::error!("Failed to {} view on first iteration: {}", operation, error);
            self.diagnostics
                .note(format!("Failed to {} view: {}", operation, error));
            self.state.records.clear();
            StopReason::InitialFailure
        } else {
            tracing::warn!(
                "Failed to {} view on iteration {}, keeping {} records: {}",
                operation,
                iteration,
                self.state.accepted(),
                error
            );
            self.diagnostics.note(format!(
                "View stopped responding on iteration {} ({}); returning partial results",
                iteration, error
            ));
            StopReason::Stall
        }
    }

    fn finish(self, stop_reason: StopReason) -> CollectionResult {
        let elapsed = self.state.elapsed();
        tracing::info!(
            "Collection finished ({}): {} records in {} iterations, {} advances, {:?}",
            stop_reason,
            self.state.accepted(),
            self.state.iterations,
            self.state.advances,
            elapsed
        );

        CollectionResult {
            reached_target: stop_reason == StopReason::Target,
            records: self.state.records,
            stop_reason,
            iterations: self.state.iterations,
            advances: self.state.advances,
            elapsed,
            diagnostics: self.diagnostics,
        }
    }
}

/// Runs one collection loop to completion
///
/// # Arguments
///
/// * `view` - The feed view; read and advanced in strict alternation
/// * `extractor` - Record extractor for the view's items
/// * `key_fields` - Fields forming the identity key
/// * `target` - Optional number of records to stop at
/// * `policy` - Stall threshold and budgets
///
/// # Example
///
/// ```no_run
/// use feed_harvest::collect::{collect, StopPolicy};
/// use feed_harvest::source::{FeedSource, FieldExtractor, FileFeedSource};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = FileFeedSource::new("fixtures/feed.json", Some("URL".to_string()));
/// let mut view = source.open("dentists").await?;
/// let columns = vec!["Name".to_string(), "URL".to_string()];
/// let extractor = FieldExtractor::new(columns.clone());
/// let result = collect(view.as_mut(), &extractor, columns, Some(25), StopPolicy::default()).await;
/// println!("{} records ({})", result.records.len(), result.stop_reason);
/// # Ok(())
/// # }
/// ```
pub async fn collect(
    view: &mut dyn FeedView,
    extractor: &dyn Extractor,
    key_fields: Vec<String>,
    target: Option<usize>,
    policy: StopPolicy,
) -> CollectionResult {
    Collector::new(extractor, key_fields, target, policy)
        .run(view)
        .await
}
