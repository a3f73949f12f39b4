//! Data sources
//!
//! This module contains everything source-specific:
//! - The view and extractor interfaces the collection loop drives
//! - Paginated JSON and local fixture feeds
//! - Plugins that tie a feed to the loop and the result sink
//! - The registry the front-end resolves source identifiers against

mod extractor;
mod file_feed;
mod http_json;
mod plugin;
mod registry;
mod traits;

pub use extractor::{to_raw_item, FieldExtractor, MISSING_VALUE};
pub use file_feed::FileFeedSource;
pub use http_json::{build_http_client, fetch_page, HttpJsonSettings, HttpJsonSource};
pub use plugin::FeedPlugin;
pub use registry::{SourceInfo, SourceRegistry};
pub use traits::{Extractor, FeedSource, FeedView, PluginOutput, SourcePlugin};
