//! HTTP front-end
//!
//! Routes:
//! - `GET /health`
//! - `GET /api/plugins` lists available sources
//! - `POST /api/scrape` runs a collection request
//! - `GET /data/:filename` previews a written table

pub mod app;
pub mod routes;

pub use app::{build_app, serve, AppState};
