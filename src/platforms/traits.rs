use std::path::Path;

use async_trait::async_trait;
use video_downloader_core::models::media::{MediaMetadata, VideoDescriptor};
use video_downloader_core::{ExtractionError, Platform};

/// The external media engine: downloads a URL or describes it.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Downloads the best combined stream into `output_template`, a path whose
    /// file name ends in `.%(ext)s`, and returns the info dict.
    async fn download(
        &self,
        url: &str,
        output_template: &Path,
        format_selector: &str,
    ) -> Result<MediaMetadata, ExtractionError>;

    /// Metadata-only listing of a profile or playlist, at most `max_entries`
    /// items.
    async fn flat_listing(
        &self,
        url: &str,
        max_entries: usize,
    ) -> Result<MediaMetadata, ExtractionError>;

    /// Full (non-flat) metadata for a single URL, nothing downloaded.
    async fn metadata(&self, url: &str) -> Result<MediaMetadata, ExtractionError>;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, ExtractionError>;
}

#[async_trait]
pub trait ProfileLister: Send + Sync {
    fn platform(&self) -> Platform;

    fn can_handle(&self, url: &str) -> bool {
        Platform::from_url(url) == self.platform()
    }

    async fn list_recent(
        &self,
        url: &str,
        limit: usize,
    ) -> Result<Vec<VideoDescriptor>, ExtractionError>;
}
