//! Collection loop driven through the public API with a caller-supplied view

use async_trait::async_trait;
use feed_harvest::collect::{collect, StopPolicy, StopReason};
use feed_harvest::source::{FeedView, FieldExtractor};
use feed_harvest::{RawItem, SourceError};
use serde_json::json;

/// Infinite-scroll style view: each advance reveals `step` more listings
/// until `total` are visible, and fails on the advance numbered `fail_on`
struct ScrollingView {
    listings: Vec<RawItem>,
    visible: usize,
    step: usize,
    advances: u32,
    fail_on: Option<u32>,
}

impl ScrollingView {
    fn new(names: &[&str], step: usize) -> Self {
        let listings = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                RawItem::new(
                    format!("https://maps.example/place/{}", i),
                    json!({ "Name": name, "Address": format!("{} Main St", i) }),
                )
            })
            .collect();
        Self {
            listings,
            visible: step,
            step,
            advances: 0,
            fail_on: None,
        }
    }
}

#[async_trait]
impl FeedView for ScrollingView {
    async fn snapshot(&mut self) -> Result<Vec<RawItem>, SourceError> {
        let end = self.visible.min(self.listings.len());
        Ok(self.listings[..end].to_vec())
    }

    async fn advance(&mut self) -> Result<(), SourceError> {
        self.advances += 1;
        if self.fail_on == Some(self.advances) {
            return Err(SourceError::Timeout {
                url: "https://maps.example/feed".to_string(),
            });
        }
        self.visible += self.step;
        Ok(())
    }
}

fn columns() -> Vec<String> {
    vec!["Name".to_string(), "Address".to_string()]
}

#[tokio::test]
async fn test_scroll_feed_until_it_ends() {
    let names = ["Acme", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta"];
    let mut view = ScrollingView::new(&names, 3);
    let extractor = FieldExtractor::new(columns());

    let result = collect(
        &mut view,
        &extractor,
        vec!["Name".to_string()],
        None,
        StopPolicy::default(),
    )
    .await;

    assert_eq!(result.stop_reason, StopReason::Stall);
    assert!(!result.reached_target);
    let collected: Vec<_> = result
        .records
        .iter()
        .map(|r| r.get("Name").unwrap().to_string())
        .collect();
    assert_eq!(collected, names);
}

#[tokio::test]
async fn test_limit_stops_before_next_scroll() {
    let names = ["Acme", "Beta", "Gamma", "Delta", "Epsilon", "Zeta"];
    let mut view = ScrollingView::new(&names, 4);
    let extractor = FieldExtractor::new(columns());

    let result = collect(
        &mut view,
        &extractor,
        vec!["Name".to_string()],
        Some(3),
        StopPolicy::default(),
    )
    .await;

    assert_eq!(result.stop_reason, StopReason::Target);
    assert!(result.reached_target);
    assert_eq!(result.records.len(), 3);
    assert_eq!(view.advances, 0);
}

#[tokio::test]
async fn test_late_scroll_failure_returns_partial_results() {
    let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
    let mut view = ScrollingView::new(&names, 2);
    view.fail_on = Some(3);
    let extractor = FieldExtractor::new(columns());

    let result = collect(
        &mut view,
        &extractor,
        vec!["Name".to_string()],
        Some(10),
        StopPolicy::default(),
    )
    .await;

    assert_eq!(result.stop_reason, StopReason::Stall);
    assert_eq!(result.records.len(), 6);
    assert!(!result.diagnostics.is_empty());
}
