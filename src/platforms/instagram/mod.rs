use std::sync::Arc;

use async_trait::async_trait;
use video_downloader_core::core::page_links::{self, INSTAGRAM_ORIGIN};
use video_downloader_core::models::media::VideoDescriptor;
use video_downloader_core::ExtractionError;

use crate::platforms::traits::{MediaExtractor, PageFetcher, ProfileLister};
use crate::platforms::Platform;

const FLAT_OVERFETCH: usize = 2;
const REEL_MAX_SECS: u64 = 90;
const PLACEHOLDER_TITLE: &str = "Instagram Reel";

/// yt-dlp rarely lists Instagram profiles without a login, so a flat listing
/// is tried first and the rendered profile page is scraped when it comes back
/// empty.
pub struct InstagramLister {
    extractor: Arc<dyn MediaExtractor>,
    pages: Arc<dyn PageFetcher>,
}

impl InstagramLister {
    pub fn new(extractor: Arc<dyn MediaExtractor>, pages: Arc<dyn PageFetcher>) -> Self {
        Self { extractor, pages }
    }

    fn looks_like_reel(video: &VideoDescriptor) -> bool {
        video.url.contains("/reel/") || video.duration <= REEL_MAX_SECS
    }

    async fn flat_reels(
        &self,
        url: &str,
        limit: usize,
    ) -> Result<Vec<VideoDescriptor>, ExtractionError> {
        let listing = self
            .extractor
            .flat_listing(url, limit * FLAT_OVERFETCH)
            .await?;

        Ok(listing
            .into_entries()
            .iter()
            .filter_map(|entry| VideoDescriptor::from_metadata(entry, Platform::Instagram))
            .filter(Self::looks_like_reel)
            .take(limit)
            .collect())
    }

    async fn scrape_links(&self, url: &str) -> Result<Vec<String>, ExtractionError> {
        // Profile URLs may arrive without a scheme; the page fetch needs one.
        let page_url = page_links::absolutize(url, INSTAGRAM_ORIGIN);
        let html = self.pages.fetch_page(&page_url).await?;

        let reels = page_links::collect_links(&html, INSTAGRAM_ORIGIN, &["/reel/"]);
        if !reels.is_empty() {
            tracing::debug!("instagram: {} reel links found in page", reels.len());
            return Ok(reels);
        }

        let posts = page_links::collect_links(&html, INSTAGRAM_ORIGIN, &["/p/", "/tv/"]);
        tracing::debug!("instagram: no reel links, {} post links found", posts.len());
        Ok(posts)
    }

    async fn describe(&self, link: &str) -> VideoDescriptor {
        match self.extractor.metadata(link).await {
            Ok(meta) => {
                let title = meta.title_or_default();
                VideoDescriptor {
                    url: link.to_string(),
                    title: if title.is_empty() {
                        PLACEHOLDER_TITLE.to_string()
                    } else {
                        title
                    },
                    duration: meta.duration_secs(),
                    thumbnail: meta.thumbnail_url(),
                }
            }
            Err(e) => {
                tracing::debug!("instagram: metadata for {} unavailable: {}", link, e);
                VideoDescriptor::placeholder(link, PLACEHOLDER_TITLE)
            }
        }
    }
}

#[async_trait]
impl ProfileLister for InstagramLister {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn list_recent(
        &self,
        url: &str,
        limit: usize,
    ) -> Result<Vec<VideoDescriptor>, ExtractionError> {
        match self.flat_reels(url, limit).await {
            Ok(reels) if !reels.is_empty() => return Ok(reels),
            Ok(_) => tracing::info!("instagram: flat listing of {} empty, scraping page", url),
            Err(e) => tracing::warn!(
                "instagram: flat listing of {} failed ({}), scraping page",
                url,
                e
            ),
        }

        let links = self.scrape_links(url).await?;

        let mut videos = Vec::with_capacity(links.len().min(limit));
        for link in links.iter().take(limit) {
            videos.push(self.describe(link).await);
        }
        Ok(videos)
    }
}
