use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};

use crate::diagnostics::Diagnostics;
use crate::server::app::AppState;
use crate::service::{ResponseStatus, RunResponse, ScrapeRequest};

/// Runs one collection request
///
/// Malformed bodies are answered in the same response shape as every other
/// outcome, with 400.
pub async fn scrape_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> (StatusCode, Json<RunResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("Rejected scrape body: {}", rejection);
            let response = RunResponse::failed(
                ResponseStatus::InvalidRequest,
                rejection.body_text(),
                Diagnostics::new(),
            );
            return (StatusCode::BAD_REQUEST, Json(response));
        }
    };

    let response = state.service.run_collection(request).await;
    (status_code(response.status), Json(response))
}

fn status_code(status: ResponseStatus) -> StatusCode {
    match status {
        ResponseStatus::Ok | ResponseStatus::NoData => StatusCode::OK,
        ResponseStatus::InvalidRequest => StatusCode::BAD_REQUEST,
        ResponseStatus::UnknownSource => StatusCode::NOT_FOUND,
        ResponseStatus::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
