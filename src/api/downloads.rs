use std::io::ErrorKind;
use std::path::PathBuf;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::io::ReaderStream;
use video_downloader_core::Platform;

use super::error::{ApiError, ApiResult};
use super::{required, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileQuery {
    pub file_path: Option<String>,
}

pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> ApiResult<Json<Value>> {
    let url = required(query.url, "url")?;
    if !Platform::from_url(&url).is_supported() {
        return Err(ApiError::UnsupportedPlatform);
    }

    let media = state.fetcher.download(&url).await?;

    Ok(Json(json!({
        "success": true,
        "data": media,
    })))
}

/// Streams a previously downloaded file. The path is used as given.
pub async fn download_file(Query(query): Query<FileQuery>) -> ApiResult<Response> {
    let path = PathBuf::from(required(query.file_path, "file_path")?);

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(ApiError::FileNotFound),
        Err(e) => return Err(ApiError::Internal(e.into())),
    };
    let meta = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    if !meta.is_file() {
        return Err(ApiError::FileNotFound);
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "download".to_string());
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    let mut response = Body::from_stream(ReaderStream::new(file)).into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(meta.len()));
    if let Ok(value) = HeaderValue::from_str(&content_disposition(&file_name)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}
