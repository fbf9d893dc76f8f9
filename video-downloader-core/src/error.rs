use thiserror::Error;

/// Failure while talking to the media extractor or fetching a page.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to start yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("{message}")]
    Failed { message: String },
    #[error("yt-dlp returned invalid JSON: {0}")]
    InvalidOutput(#[from] serde_json::Error),
    #[error("page request failed: {0}")]
    Http(String),
    #[error("Downloaded file not found")]
    FileNotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    pub fn failed(message: impl Into<String>) -> Self {
        ExtractionError::Failed {
            message: message.into(),
        }
    }
}
