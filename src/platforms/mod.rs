pub use video_downloader_core::platforms::Platform;

pub mod instagram;
pub mod tiktok;
pub mod traits;
pub mod youtube;

use video_downloader_core::models::media::VideoDescriptor;
use video_downloader_core::ExtractionError;

use crate::platforms::traits::MediaExtractor;

/// Flat listing capped at `limit`, no filtering.
pub(crate) async fn direct_listing(
    extractor: &dyn MediaExtractor,
    url: &str,
    limit: usize,
    platform: Platform,
) -> Result<Vec<VideoDescriptor>, ExtractionError> {
    let listing = extractor.flat_listing(url, limit).await?;
    Ok(listing
        .into_entries()
        .iter()
        .filter_map(|entry| VideoDescriptor::from_metadata(entry, platform))
        .take(limit)
        .collect())
}
