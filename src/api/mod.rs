//! HTTP surface: routes, shared state and error rendering.

pub mod downloads;
pub mod error;
pub mod profile;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::media_fetcher::MediaFetcher;
use crate::core::profile::ProfileService;
use error::{ApiError, ApiResult};

pub const SERVICE_NAME: &str = "video-downloader";

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<MediaFetcher>,
    pub profiles: Arc<ProfileService>,
}

impl AppState {
    pub fn new(fetcher: MediaFetcher, profiles: ProfileService) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            profiles: Arc::new(profiles),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/download", get(downloads::download))
        .route("/download/file", get(downloads::download_file))
        .route("/profile/info", get(profile::profile_info))
        .route("/profile/videos", get(profile::profile_videos))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
    }))
}

/// Blank values count as missing.
fn required(value: Option<String>, name: &'static str) -> ApiResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingParameter(name))
}
