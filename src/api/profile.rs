use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use video_downloader_core::core::url_parser;
use video_downloader_core::Platform;

use super::error::{ApiError, ApiResult};
use super::{required, AppState};
use crate::core::profile::DEFAULT_VIDEO_LIMIT;

const MAX_VIDEO_LIMIT: i64 = 50;
const INSTAGRAM_HINT: &str =
    "Instagram hides profile videos from anonymous visitors; the profile may require login";

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub url: Option<String>,
    /// Kept as text so a malformed value is reported as a 400 with a message.
    pub limit: Option<String>,
}

fn profile_url(url: Option<String>) -> ApiResult<(String, Platform)> {
    let url = required(url, "url")?;
    let platform = Platform::from_url(&url);
    if !platform.is_supported() {
        return Err(ApiError::UnsupportedPlatform);
    }
    if !url_parser::is_profile_url(&url) {
        return Err(ApiError::NotAProfileUrl);
    }
    Ok((url, platform))
}

fn parse_limit(raw: Option<&str>) -> ApiResult<usize> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_VIDEO_LIMIT);
    };
    let n = raw.parse::<i64>().map_err(|_| {
        ApiError::InvalidParameter(format!("\"limit\" must be an integer, got \"{}\"", raw))
    })?;
    if n < 1 {
        return Err(ApiError::InvalidParameter(format!(
            "\"limit\" must be at least 1, got {}",
            n
        )));
    }
    Ok(n.min(MAX_VIDEO_LIMIT) as usize)
}

pub async fn profile_info(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<Value>> {
    let (url, _) = profile_url(query.url)?;
    let info = state.profiles.profile_info(&url).await;

    Ok(Json(json!({
        "success": true,
        "data": info,
    })))
}

pub async fn profile_videos(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<Value>> {
    let (url, platform) = profile_url(query.url)?;
    let limit = parse_limit(query.limit.as_deref())?;

    let videos = state.profiles.list_recent_videos(&url, limit).await;
    if videos.is_empty() {
        return Err(ApiError::NoVideosFound {
            hint: (platform == Platform::Instagram).then_some(INSTAGRAM_HINT),
        });
    }

    Ok(Json(json!({
        "success": true,
        "data": {
            "count": videos.len(),
            "videos": videos,
            "platform": platform,
        },
    })))
}
