use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::output::{load_table, resolve_output_file};
use crate::server::app::AppState;

/// Returns a written result table as `{headers, rows}`
pub async fn data_handler(
    Extension(state): Extension<AppState>,
    Path(filename): Path<String>,
) -> Response {
    let path = match resolve_output_file(state.service.output_dir(), &filename) {
        Ok(path) => path,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
                .into_response()
        }
    };

    if !path.is_file() {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "File not found" }))).into_response();
    }

    let table_path = path.clone();
    let loaded = match tokio::task::spawn_blocking(move || load_table(&table_path, None)).await {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Preview task for {} failed: {}", path.display(), e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to read file" })),
            )
                .into_response();
        }
    };

    match loaded {
        Ok(table) => Json(table).into_response(),
        Err(e) => {
            tracing::error!("Failed to read {}: {}", path.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
