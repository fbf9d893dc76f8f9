use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use video_downloader_core::models::media::MediaMetadata;
use video_downloader_core::ExtractionError;

use crate::api::AppState;
use crate::core::media_fetcher::MediaFetcher;
use crate::core::profile::ProfileService;
use crate::platforms::traits::{MediaExtractor, PageFetcher};

/// State whose profile page fetches always fail, downloading into `dir`.
pub fn app_state(extractor: Arc<FakeExtractor>, dir: &Path) -> AppState {
    AppState::new(
        MediaFetcher::new(extractor.clone(), dir.to_path_buf()),
        ProfileService::new(extractor, Arc::new(FakePageFetcher::unreachable())),
    )
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn entry(url: &str, duration: u64) -> MediaMetadata {
    MediaMetadata {
        url: Some(url.to_string()),
        title: Some(format!("title of {}", url)),
        duration: Some(duration as f64),
        ..Default::default()
    }
}

pub fn listing(entries: Vec<MediaMetadata>) -> MediaMetadata {
    MediaMetadata {
        entries: Some(entries.into_iter().map(Some).collect()),
        ..Default::default()
    }
}

pub enum DownloadBehavior {
    Writes { ext: &'static str, meta: MediaMetadata },
    WritesNothing,
    FailsAfterPartial { message: &'static str },
}

#[derive(Default)]
pub struct FakeExtractor {
    listing: Option<MediaMetadata>,
    error: Option<String>,
    metadata: HashMap<String, MediaMetadata>,
    download: Option<DownloadBehavior>,
    listing_calls: Mutex<Vec<(String, usize)>>,
    metadata_calls: Mutex<Vec<String>>,
    download_calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn with_listing(listing: MediaMetadata) -> Self {
        Self {
            listing: Some(listing),
            ..Default::default()
        }
    }

    /// Every call fails unless a more specific answer was registered.
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn downloading(behavior: DownloadBehavior) -> Self {
        Self {
            download: Some(behavior),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, url: &str, meta: MediaMetadata) -> Self {
        self.metadata.insert(url.to_string(), meta);
        self
    }

    pub fn listing_calls(&self) -> Vec<(String, usize)> {
        self.listing_calls.lock().unwrap().clone()
    }

    pub fn metadata_calls(&self) -> Vec<String> {
        self.metadata_calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.listing_calls.lock().unwrap().len()
            + self.metadata_calls.lock().unwrap().len()
            + self.download_calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> ExtractionError {
        ExtractionError::failed(self.error.clone().unwrap_or_else(|| "no answer".to_string()))
    }
}

fn expand_template(template: &Path, ext: &str) -> std::path::PathBuf {
    let raw = template.to_string_lossy().replace("%(ext)s", ext);
    std::path::PathBuf::from(raw)
}

#[async_trait]
impl MediaExtractor for FakeExtractor {
    async fn download(
        &self,
        _url: &str,
        output_template: &Path,
        _format_selector: &str,
    ) -> Result<MediaMetadata, ExtractionError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        match &self.download {
            Some(DownloadBehavior::Writes { ext, meta }) => {
                std::fs::write(expand_template(output_template, ext), b"video")?;
                Ok(meta.clone())
            }
            Some(DownloadBehavior::WritesNothing) => Ok(MediaMetadata::default()),
            Some(DownloadBehavior::FailsAfterPartial { message }) => {
                std::fs::write(expand_template(output_template, "mp4.part"), b"partial")?;
                std::fs::write(expand_template(output_template, "f137.mp4"), b"fragment")?;
                Err(ExtractionError::failed(*message))
            }
            None => Err(self.fail()),
        }
    }

    async fn flat_listing(
        &self,
        url: &str,
        max_entries: usize,
    ) -> Result<MediaMetadata, ExtractionError> {
        self.listing_calls
            .lock()
            .unwrap()
            .push((url.to_string(), max_entries));
        match &self.listing {
            Some(listing) => Ok(listing.clone()),
            None => Err(self.fail()),
        }
    }

    async fn metadata(&self, url: &str) -> Result<MediaMetadata, ExtractionError> {
        self.metadata_calls.lock().unwrap().push(url.to_string());
        match self.metadata.get(url) {
            Some(meta) => Ok(meta.clone()),
            None => Err(self.fail()),
        }
    }
}

pub struct FakePageFetcher {
    html: Option<String>,
    fetched: Mutex<Vec<String>>,
}

impl FakePageFetcher {
    pub fn serving(html: &str) -> Self {
        Self {
            html: Some(html.to_string()),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            html: None,
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakePageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, ExtractionError> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.html
            .clone()
            .ok_or_else(|| ExtractionError::Http("connection refused".to_string()))
    }
}
