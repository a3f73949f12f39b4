/// Collection state and stop reasons
///
/// The state is the working memory of one collection loop instance. It is
/// created empty when a run starts and never shared between runs.
use crate::collect::identity::IdentityTracker;
use crate::model::Record;
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

/// Why a collection run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The requested number of records was accepted
    Target,

    /// The feed stopped growing, the view failed mid-run, or the time budget ran out
    Stall,

    /// The maximum number of advance operations was executed
    Ceiling,

    /// The view could not be read or advanced on the first iteration
    InitialFailure,
}

impl StopReason {
    /// Returns true if the run produced no usable output
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::InitialFailure)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Target => "target",
            Self::Stall => "stall",
            Self::Ceiling => "ceiling",
            Self::InitialFailure => "initial-failure",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "target" => Some(Self::Target),
            "stall" => Some(Self::Stall),
            "ceiling" => Some(Self::Ceiling),
            "initial-failure" => Some(Self::InitialFailure),
            _ => None,
        }
    }

    pub fn all() -> [Self; 4] {
        [
            Self::Target,
            Self::Stall,
            Self::Ceiling,
            Self::InitialFailure,
        ]
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Working memory of a single collection loop
#[derive(Debug)]
pub struct CollectionState {
    /// Accepted records in acceptance order
    pub records: Vec<Record>,

    /// Identity keys of accepted records
    pub identities: IdentityTracker,

    /// Raw handles that were already handed to the extractor
    pub visited_handles: HashSet<String>,

    /// Visible item count read after the most recent advance
    pub last_visible: Option<usize>,

    /// Consecutive advances that did not grow the visible item count
    pub unchanged_iterations: u32,

    /// Iterations started so far
    pub iterations: u32,

    /// Successful advance operations so far
    pub advances: u32,

    pub started_at: Instant,
}

impl CollectionState {
    pub fn new(key_fields: Vec<String>) -> Self {
        Self {
            records: Vec::new(),
            identities: IdentityTracker::new(key_fields),
            visited_handles: HashSet::new(),
            last_visible: None,
            unchanged_iterations: 0,
            iterations: 0,
            advances: 0,
            started_at: Instant::now(),
        }
    }

    /// Number of accepted records
    pub fn accepted(&self) -> usize {
        self.records.len()
    }

    /// Records the visible item count before and after one advance
    ///
    /// Returns the updated number of consecutive advances without growth.
    pub fn observe_advance(&mut self, before: usize, after: usize) -> u32 {
        if after > before {
            self.unchanged_iterations = 0;
        } else {
            self.unchanged_iterations += 1;
        }
        self.last_visible = Some(after);
        self.unchanged_iterations
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_failure() {
        assert!(StopReason::InitialFailure.is_failure());

        assert!(!StopReason::Target.is_failure());
        assert!(!StopReason::Stall.is_failure());
        assert!(!StopReason::Ceiling.is_failure());
    }

    #[test]
    fn test_string_forms() {
        for reason in StopReason::all() {
            assert_eq!(StopReason::from_str_opt(reason.as_str()), Some(reason));
        }
        assert_eq!(StopReason::from_str_opt("deadline"), None);
        assert_eq!(format!("{}", StopReason::InitialFailure), "initial-failure");
    }

    #[test]
    fn test_observe_advance_counts_consecutive_flat_advances() {
        let mut state = CollectionState::new(vec!["Name".to_string()]);

        assert_eq!(state.observe_advance(3, 3), 1);
        assert_eq!(state.observe_advance(3, 6), 0);
        assert_eq!(state.observe_advance(6, 6), 1);
        assert_eq!(state.observe_advance(6, 6), 2);
        assert_eq!(state.last_visible, Some(6));
    }

    #[test]
    fn test_shrinking_feed_is_not_growth() {
        let mut state = CollectionState::new(Vec::new());
        assert_eq!(state.observe_advance(0, 0), 1);
        assert_eq!(state.observe_advance(5, 4), 2);
        assert_eq!(state.observe_advance(4, 5), 0);
    }
}
