//! Output module for persisting run results
//!
//! This module handles:
//! - Writing the accepted records of a run as a CSV table
//! - Naming output files so concurrent runs never collide
//! - Reading written tables back for previews

mod csv_sink;
pub mod naming;
mod table;
mod traits;

pub use csv_sink::CsvSink;
pub use naming::{output_file_name, output_path, sanitize_query};
pub use table::{load_table, resolve_output_file, Table};
pub use traits::{OutputError, OutputResult, ResultSink};
