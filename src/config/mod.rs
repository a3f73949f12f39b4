//! Configuration module for Feed-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use feed_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Stall threshold: {}", config.collection.stall_threshold);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BudgetConfig, CollectionConfig, Config, HttpConfig, OutputConfig, ServerConfig, SourceConfig,
    SourceKind,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
