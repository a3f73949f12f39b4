//! Integration tests for Feed-Harvest

mod collect_tests;
mod http_feed_tests;
mod service_tests;
