//! Termination policy for the collection loop
//!
//! This module decides when a run stops:
//! - Target reached (checked before spending an advance)
//! - Stall: advancing the view stopped growing the visible item count
//! - Scroll ceiling: too many advance operations
//! - Deadline: the wall-clock budget ran out (reported as a stall)
//!
//! Runs with a target and runs that must exhaust the feed use separate
//! budgets; the exhaustive one is larger.

use crate::collect::state::{CollectionState, StopReason};
use crate::config::{BudgetConfig, CollectionConfig};
use std::time::Duration;

/// Work limits for a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    /// Maximum number of advance operations
    pub max_advances: u32,

    /// Wall-clock limit, checked once per iteration
    pub time_budget: Duration,
}

impl From<&BudgetConfig> for Budget {
    fn from(config: &BudgetConfig) -> Self {
        Self {
            max_advances: config.max_advances,
            time_budget: Duration::from_secs(config.time_budget_secs),
        }
    }
}

/// Termination rules shared by every run of a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopPolicy {
    /// Consecutive no-growth iterations that count as a stall
    pub stall_threshold: u32,

    /// Budget for runs with a target count
    pub targeted: Budget,

    /// Budget for runs that collect everything
    pub exhaustive: Budget,
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self::from_config(&CollectionConfig::default())
    }
}

/// Outcome of the post-advance checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopDecision {
    pub reason: StopReason,
    pub message: String,
}

impl StopPolicy {
    pub fn from_config(config: &CollectionConfig) -> Self {
        Self {
            stall_threshold: config.stall_threshold,
            targeted: Budget::from(&config.targeted),
            exhaustive: Budget::from(&config.exhaustive),
        }
    }

    /// Selects the budget for a run
    pub fn budget_for(&self, target: Option<usize>) -> Budget {
        match target {
            Some(_) => self.targeted,
            None => self.exhaustive,
        }
    }

    /// Returns true once the accepted count meets the target
    pub fn target_reached(&self, target: Option<usize>, accepted: usize) -> bool {
        target.map_or(false, |target| accepted >= target)
    }

    /// Evaluates stall, ceiling and deadline after an advance
    ///
    /// Checks are applied in that order; the first one that fires wins.
    pub fn check_progress(&self, state: &CollectionState, budget: &Budget) -> Option<StopDecision> {
        if state.unchanged_iterations >= self.stall_threshold {
            return Some(StopDecision {
                reason: StopReason::Stall,
                message: format!(
                    "No new results loaded after {} attempts ({} items visible)",
                    state.unchanged_iterations,
                    state.last_visible.unwrap_or(0)
                ),
            });
        }

        if state.advances >= budget.max_advances {
            return Some(StopDecision {
                reason: StopReason::Ceiling,
                message: format!("Scroll ceiling of {} reached", budget.max_advances),
            });
        }

        let elapsed = state.elapsed();
        if elapsed >= budget.time_budget {
            return Some(StopDecision {
                reason: StopReason::Stall,
                message: format!(
                    "Time budget of {:?} exhausted after {:?}",
                    budget.time_budget, elapsed
                ),
            });
        }

        None
    }
}
