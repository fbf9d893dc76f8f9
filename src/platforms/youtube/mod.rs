use std::sync::Arc;

use async_trait::async_trait;
use video_downloader_core::core::url_parser;
use video_downloader_core::models::media::VideoDescriptor;
use video_downloader_core::ExtractionError;

use crate::platforms::traits::{MediaExtractor, ProfileLister};
use crate::platforms::{direct_listing, Platform};

const SHORTS_OVERFETCH: usize = 3;
const SHORT_MAX_SECS: u64 = 60;

pub struct YouTubeLister {
    extractor: Arc<dyn MediaExtractor>,
}

impl YouTubeLister {
    pub fn new(extractor: Arc<dyn MediaExtractor>) -> Self {
        Self { extractor }
    }

    fn is_short(video: &VideoDescriptor) -> bool {
        video.url.contains("/shorts/") || (video.duration > 0 && video.duration <= SHORT_MAX_SECS)
    }

    async fn list_shorts(
        &self,
        shorts_url: &str,
        limit: usize,
    ) -> Result<Vec<VideoDescriptor>, ExtractionError> {
        tracing::debug!("youtube: listing shorts from {}", shorts_url);

        let listing = self
            .extractor
            .flat_listing(shorts_url, limit * SHORTS_OVERFETCH)
            .await?;

        Ok(listing
            .into_entries()
            .iter()
            .filter_map(|entry| VideoDescriptor::from_metadata(entry, Platform::YouTube))
            .filter(Self::is_short)
            .take(limit)
            .collect())
    }
}

#[async_trait]
impl ProfileLister for YouTubeLister {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn list_recent(
        &self,
        url: &str,
        limit: usize,
    ) -> Result<Vec<VideoDescriptor>, ExtractionError> {
        match url_parser::youtube_shorts_listing(url) {
            Some(shorts_url) => self.list_shorts(&shorts_url, limit).await,
            None => direct_listing(self.extractor.as_ref(), url, limit, Platform::YouTube).await,
        }
    }
}
