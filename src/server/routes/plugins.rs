use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;
use crate::source::SourceInfo;

#[derive(Serialize)]
pub struct PluginsResponse {
    plugins: Vec<SourceInfo>,
}

pub async fn plugins_handler(Extension(state): Extension<AppState>) -> Json<PluginsResponse> {
    Json(PluginsResponse {
        plugins: state.service.list_sources(),
    })
}
