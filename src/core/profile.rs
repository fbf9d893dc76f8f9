use std::sync::Arc;

use video_downloader_core::models::media::VideoDescriptor;
use video_downloader_core::models::profile::ProfileInfo;
use video_downloader_core::Platform;

use crate::core::registry::ListerRegistry;
use crate::platforms::instagram::InstagramLister;
use crate::platforms::tiktok::TikTokLister;
use crate::platforms::traits::{MediaExtractor, PageFetcher};
use crate::platforms::youtube::YouTubeLister;

pub const DEFAULT_VIDEO_LIMIT: usize = 3;

/// Profile-level lookups. Both operations degrade to an empty answer instead
/// of failing; the cause is logged.
pub struct ProfileService {
    extractor: Arc<dyn MediaExtractor>,
    registry: ListerRegistry,
}

impl ProfileService {
    pub fn new(extractor: Arc<dyn MediaExtractor>, pages: Arc<dyn PageFetcher>) -> Self {
        let mut registry = ListerRegistry::new();
        registry.register(Arc::new(YouTubeLister::new(extractor.clone())));
        registry.register(Arc::new(TikTokLister::new(extractor.clone())));
        registry.register(Arc::new(InstagramLister::new(extractor.clone(), pages)));

        Self {
            extractor,
            registry,
        }
    }

    pub async fn list_recent_videos(&self, url: &str, limit: usize) -> Vec<VideoDescriptor> {
        let Some(lister) = self.registry.find_lister(url) else {
            return Vec::new();
        };

        match lister.list_recent(url, limit).await {
            Ok(mut videos) => {
                videos.truncate(limit);
                tracing::info!(
                    "{}: {} recent videos for {}",
                    lister.platform(),
                    videos.len(),
                    url
                );
                videos
            }
            Err(e) => {
                tracing::warn!("{}: listing {} failed: {}", lister.platform(), url, e);
                Vec::new()
            }
        }
    }

    pub async fn profile_info(&self, url: &str) -> ProfileInfo {
        let platform = Platform::from_url(url);
        if !platform.is_supported() {
            return ProfileInfo::default();
        }

        match self.extractor.metadata(url).await {
            Ok(meta) => ProfileInfo::from_metadata(platform, &meta),
            Err(e) => {
                tracing::warn!("{}: profile info for {} failed: {}", platform, url, e);
                ProfileInfo::default()
            }
        }
    }
}
