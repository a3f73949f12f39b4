//! Per-run diagnostics
//!
//! Each run owns its own `Diagnostics` value and hands it back to the caller
//! inside the run result, so troubleshooting output never leaks between
//! concurrent runs. Messages are also emitted through `tracing` by the code
//! that records them.

use serde::Serialize;
use std::collections::VecDeque;

/// Number of messages kept per run; older messages are dropped first
pub const MAX_MESSAGES: usize = 50;

/// Bounded, ordered list of user-facing troubleshooting messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    messages: VecDeque<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, evicting the oldest one when full
    pub fn note(&mut self, message: impl Into<String>) {
        if self.messages.len() == MAX_MESSAGES {
            self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }

    /// Appends every message of `other` in order
    pub fn extend(&mut self, other: Diagnostics) {
        for message in other.messages {
            self.note(message);
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
