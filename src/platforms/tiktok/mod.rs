use std::sync::Arc;

use async_trait::async_trait;
use video_downloader_core::models::media::VideoDescriptor;
use video_downloader_core::ExtractionError;

use crate::platforms::traits::{MediaExtractor, ProfileLister};
use crate::platforms::{direct_listing, Platform};

pub struct TikTokLister {
    extractor: Arc<dyn MediaExtractor>,
}

impl TikTokLister {
    pub fn new(extractor: Arc<dyn MediaExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl ProfileLister for TikTokLister {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    async fn list_recent(
        &self,
        url: &str,
        limit: usize,
    ) -> Result<Vec<VideoDescriptor>, ExtractionError> {
        direct_listing(self.extractor.as_ref(), url, limit, Platform::TikTok).await
    }
}
