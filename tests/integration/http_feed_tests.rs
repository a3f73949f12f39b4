//! End-to-end runs against a mocked JSON search endpoint
//!
//! These tests use wiremock to stand in for a paginated directory API and
//! drive full requests through the registry, the collection loop and the
//! CSV sink.

use feed_harvest::config::parse_config;
use feed_harvest::service::{HarvestService, ResponseStatus, ScrapeRequest};
use feed_harvest::source::SourceRegistry;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a service with one `directory` source pointed at the mock server
fn create_service(server: &MockServer, output: &TempDir) -> HarvestService {
    let config = parse_config(&format!(
        r#"
[output]
directory = "{output}"

[[source]]
id = "directory"
description = "Supplier directory"
kind = "http-json"
endpoint = "{endpoint}/search"
items-field = "results"
handle-field = "URL"
columns = ["Company Name", "Location", "Phone", "URL"]
key-fields = ["Company Name", "Location", "Phone"]
"#,
        output = output.path().display(),
        endpoint = server.uri()
    ))
    .expect("Failed to parse test config");

    let registry = SourceRegistry::from_config(&config).expect("Failed to build registry");
    HarvestService::new(registry, &config.output.directory)
}

fn supplier(name: &str, location: &str, url: &str) -> Value {
    json!({
        "Company Name": name,
        "Location": location,
        "Phone": "020 5550100",
        "URL": url,
    })
}

async fn mount_page(server: &MockServer, page: &str, results: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "steel pipes"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .mount(server)
        .await;
}

fn request(limit: Option<usize>) -> ScrapeRequest {
    ScrapeRequest {
        source: Some("directory".to_string()),
        query: Some("steel pipes".to_string()),
        limit,
    }
}

#[tokio::test]
async fn test_paginated_feed_until_exhausted() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &server,
        "1",
        vec![
            supplier("Acme Tubes", "Pune", "https://d.example/acme"),
            supplier("Beta Metals", "Delhi", "https://d.example/beta"),
        ],
    )
    .await;
    // Same supplier listed again under a different URL
    mount_page(
        &server,
        "2",
        vec![
            supplier("ACME  Tubes", "pune", "https://d.example/acme-2"),
            supplier("Gamma Steel", "Goa", "https://d.example/gamma"),
        ],
    )
    .await;
    mount_page(&server, "3", vec![]).await;

    let service = create_service(&server, &output);
    let response = service.run_collection(request(None)).await;

    assert!(response.success, "{:?}", response);
    assert_eq!(response.count, 3);
    assert!(response.note.is_none());

    let content = std::fs::read_to_string(response.file.unwrap()).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines[0], "Company Name,Location,Phone,URL");
    assert_eq!(
        lines[1..],
        [
            "Acme Tubes,Pune,020 5550100,https://d.example/acme",
            "Beta Metals,Delhi,020 5550100,https://d.example/beta",
            "Gamma Steel,Goa,020 5550100,https://d.example/gamma",
        ]
    );
}

#[tokio::test]
async fn test_limit_skips_remaining_pages() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                supplier("Acme Tubes", "Pune", "https://d.example/acme"),
                supplier("Beta Metals", "Delhi", "https://d.example/beta"),
                supplier("Gamma Steel", "Goa", "https://d.example/gamma"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let service = create_service(&server, &output);
    let response = service.run_collection(request(Some(2))).await;

    assert!(response.success);
    assert_eq!(response.count, 2);
    assert!(response.note.is_none());
}

#[tokio::test]
async fn test_unreachable_feed_is_initial_failure() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = create_service(&server, &output);
    let response = service.run_collection(request(Some(5))).await;

    assert!(!response.success);
    assert_eq!(response.status, ResponseStatus::Failed);
    assert_eq!(response.count, 0);
    assert!(response.file.is_none());
    assert!(response
        .diagnostics
        .messages()
        .any(|m| m.contains("500")));
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_failure_after_first_page_keeps_partial_results() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &server,
        "1",
        vec![
            supplier("Acme Tubes", "Pune", "https://d.example/acme"),
            supplier("Beta Metals", "Delhi", "https://d.example/beta"),
        ],
    )
    .await;
    mount_page(
        &server,
        "2",
        vec![supplier("Gamma Steel", "Goa", "https://d.example/gamma")],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = create_service(&server, &output);
    let response = service.run_collection(request(Some(10))).await;

    assert!(response.success, "{:?}", response);
    assert_eq!(response.count, 3);
    assert_eq!(
        response.note.as_deref(),
        Some("Only 3 records found out of requested 10.")
    );
    assert!(response
        .diagnostics
        .messages()
        .any(|m| m.contains("partial results")));
}
