//! Config-driven runs against recorded fixture feeds

use feed_harvest::config::parse_config;
use feed_harvest::output::load_table;
use feed_harvest::service::{HarvestService, ResponseStatus, ScrapeRequest};
use feed_harvest::source::SourceRegistry;
use std::path::PathBuf;
use tempfile::TempDir;

const FIXTURE: &str = r#"{
  "pages": [
    [
      { "Name": "Cafe Uno", "Address": "1 Main St", "Rating": "4.5", "link": "/p/1" },
      { "Name": "Cafe Duo", "Address": "2 Main St", "link": "/p/2" }
    ],
    [
      { "Name": "cafe uno", "Address": "1  Main St", "Rating": "4.4", "link": "/p/3" },
      "not a listing",
      { "Name": "Cafe Trio", "Address": "3 Main St", "Rating": "3.9", "link": "/p/4" }
    ]
  ]
}"#;

struct Setup {
    _dir: TempDir,
    output: PathBuf,
    service: HarvestService,
}

fn setup() -> Setup {
    let dir = TempDir::new().unwrap();
    let fixture = dir.path().join("cafes.json");
    std::fs::write(&fixture, FIXTURE).unwrap();
    let output = dir.path().join("static");

    let config = parse_config(&format!(
        r#"
[collection]
stall-threshold = 2

[output]
directory = "{output}"

[[source]]
id = "recorded_maps"
description = "Recorded map listings"
kind = "file"
path = "{fixture}"
handle-field = "link"
columns = ["Name", "Address", "Rating"]
key-fields = ["Name", "Address"]

[[source]]
id = "hidden"
kind = "file"
path = "{fixture}"
columns = ["Name"]
key-fields = ["Name"]
"#,
        output = output.display(),
        fixture = fixture.display()
    ))
    .expect("Failed to parse test config");

    let registry = SourceRegistry::from_config(&config).expect("Failed to build registry");
    Setup {
        _dir: dir,
        service: HarvestService::new(registry, &config.output.directory),
        output,
    }
}

fn request(source: &str, limit: Option<usize>) -> ScrapeRequest {
    ScrapeRequest {
        source: Some(source.to_string()),
        query: Some("Cafes near me".to_string()),
        limit,
    }
}

#[tokio::test]
async fn test_recorded_feed_end_to_end() {
    let setup = setup();

    let response = setup.service.run_collection(request("recorded_maps", None)).await;

    assert!(response.success, "{:?}", response);
    assert_eq!(response.count, 3);
    assert!(response
        .diagnostics
        .messages()
        .any(|m| m.contains("Failed to extract")));

    let file = PathBuf::from(response.file.unwrap());
    assert!(file.starts_with(&setup.output));
    let table = load_table(&file, None).unwrap();
    assert_eq!(table.headers, vec!["Name", "Address", "Rating"]);
    assert_eq!(
        table.rows,
        vec![
            vec!["Cafe Uno", "1 Main St", "4.5"],
            vec!["Cafe Duo", "2 Main St", "N/A"],
            vec!["Cafe Trio", "3 Main St", "3.9"],
        ]
    );
}

#[tokio::test]
async fn test_source_without_description_is_unavailable() {
    let setup = setup();

    let ids: Vec<_> = setup
        .service
        .list_sources()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["recorded_maps"]);

    let response = setup.service.run_collection(request("hidden", None)).await;
    assert!(!response.success);
    assert_eq!(response.status, ResponseStatus::UnknownSource);
}

#[tokio::test]
async fn test_concurrent_runs_write_separate_files() {
    let setup = setup();

    let (first, second) = tokio::join!(
        setup.service.run_collection(request("recorded_maps", Some(1))),
        setup.service.run_collection(request("recorded_maps", Some(1))),
    );

    assert!(first.success && second.success);
    assert_ne!(first.file, second.file);
    assert_eq!(std::fs::read_dir(&setup.output).unwrap().count(), 2);
}
