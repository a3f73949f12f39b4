//! Application setup and server configuration.

use std::net::SocketAddr;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::routes::{data_handler, health_handler, plugins_handler, scrape_handler};
use crate::service::HarvestService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: HarvestService,
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // Browser extensions call the API from arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let api = Router::new()
        .route("/api/plugins", get(plugins_handler))
        .route("/api/scrape", post(scrape_handler))
        .layer(cors);

    Router::new()
        .merge(api)
        .route("/data/:filename", get(data_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Serves the application until Ctrl-C
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, stopping server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::StopPolicy;
    use crate::output::CsvSink;
    use crate::source::{FeedPlugin, FieldExtractor, FileFeedSource, SourceRegistry};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::{NamedTempFile, TempDir};
    use tower::ServiceExt;

    struct Fixture {
        _feed: NamedTempFile,
        output: TempDir,
        app: Router,
    }

    fn fixture() -> Fixture {
        let mut feed = NamedTempFile::new().unwrap();
        feed.write_all(
            br#"{ "pages": [[{ "Name": "Acme", "City": "Pune" }, { "Name": "Beta", "City": "Goa" }]] }"#,
        )
        .unwrap();
        feed.flush().unwrap();

        let mut registry = SourceRegistry::new();
        registry.register(
            "recorded",
            Arc::new(FeedPlugin::new(
                "recorded",
                "Recorded feed",
                Box::new(FileFeedSource::new(feed.path(), None)),
                FieldExtractor::new(vec!["Name".to_string(), "City".to_string()]),
                vec!["Name".to_string()],
                StopPolicy::default(),
                Arc::new(CsvSink::new()),
            )),
        );

        let output = TempDir::new().unwrap();
        let service = HarvestService::new(registry, output.path());
        Fixture {
            _feed: feed,
            app: build_app(AppState { service }),
            output,
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn scrape(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/scrape")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let fixture = fixture();
        let response = fixture
            .app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["sources"], 1);
    }

    #[tokio::test]
    async fn test_list_plugins() {
        let fixture = fixture();
        let response = fixture
            .app
            .oneshot(Request::get("/api/plugins").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["plugins"][0]["id"], "recorded");
        assert_eq!(body["plugins"][0]["description"], "Recorded feed");
    }

    #[tokio::test]
    async fn test_scrape_then_preview() {
        let fixture = fixture();
        let response = fixture
            .app
            .clone()
            .oneshot(scrape(r#"{ "site": "recorded", "query": "cafes", "limit": 1 }"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);

        let file = std::path::PathBuf::from(body["file"].as_str().unwrap());
        assert!(file.starts_with(fixture.output.path()));
        let name = file.file_name().unwrap().to_str().unwrap();

        let preview = fixture
            .app
            .oneshot(
                Request::get(format!("/data/{}", name))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(preview.status(), StatusCode::OK);
        let table = json_body(preview).await;
        assert_eq!(table["headers"], serde_json::json!(["Name", "City"]));
        assert_eq!(table["rows"], serde_json::json!([["Acme", "Pune"]]));
    }

    #[tokio::test]
    async fn test_scrape_unknown_source() {
        let fixture = fixture();
        let response = fixture
            .app
            .oneshot(scrape(r#"{ "source": "nope", "query": "cafes" }"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Plugin not found for site: nope");
    }

    #[tokio::test]
    async fn test_scrape_missing_fields() {
        let fixture = fixture();
        let response = fixture
            .app
            .oneshot(scrape(r#"{ "site": "recorded" }"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "site and query are required");
    }

    #[tokio::test]
    async fn test_scrape_malformed_body() {
        let fixture = fixture();
        let response = fixture.app.oneshot(scrape("{ not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_preview_missing_file() {
        let fixture = fixture();
        let response = fixture
            .app
            .oneshot(Request::get("/data/absent.csv").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_on_api() {
        let fixture = fixture();
        let response = fixture
            .app
            .oneshot(
                Request::get("/api/plugins")
                    .header("origin", "chrome-extension://abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
