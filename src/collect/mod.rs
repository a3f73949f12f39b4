//! Incremental collection loop
//!
//! This module contains the core harvesting logic:
//! - Reading cumulative batches from a feed view
//! - Skipping already-processed raw items by handle
//! - Extracting records and deduplicating them by identity key
//! - Deciding when to advance the view and when to stop

mod collector;
pub mod identity;
mod policy;
mod state;

pub use collector::{collect, CollectionResult, Collector};
pub use identity::{normalize, normalize_value, IdentityKey, IdentityTracker};
pub use policy::{Budget, StopDecision, StopPolicy};
pub use state::{CollectionState, StopReason};
