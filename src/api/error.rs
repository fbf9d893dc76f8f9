use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use video_downloader_core::ExtractionError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing \"{0}\" query parameter")]
    MissingParameter(&'static str),
    #[error("{0}")]
    InvalidParameter(String),
    #[error("Unsupported platform. Supported: YouTube, TikTok, Instagram")]
    UnsupportedPlatform,
    #[error("URL does not point to a profile or channel")]
    NotAProfileUrl,
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("File not found")]
    FileNotFound,
    #[error("No videos found for this profile{}", hint_suffix(.hint))]
    NoVideosFound { hint: Option<&'static str> },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    hint.map(|h| format!(". {}", h)).unwrap_or_default()
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_)
            | ApiError::InvalidParameter(_)
            | ApiError::UnsupportedPlatform
            | ApiError::NotAProfileUrl => StatusCode::BAD_REQUEST,
            ApiError::FileNotFound | ApiError::NoVideosFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Extraction(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
