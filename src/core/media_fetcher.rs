use std::path::{Path, PathBuf};
use std::sync::Arc;

use uuid::Uuid;
use video_downloader_core::models::media::DownloadedMedia;
use video_downloader_core::{ExtractionError, Platform};

use crate::platforms::traits::MediaExtractor;

/// Best mp4 video + m4a audio, else best single mp4, else anything.
pub const FORMAT_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

const PROBE_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "mov"];

pub struct MediaFetcher {
    extractor: Arc<dyn MediaExtractor>,
    download_dir: PathBuf,
}

impl MediaFetcher {
    pub fn new(extractor: Arc<dyn MediaExtractor>, download_dir: PathBuf) -> Self {
        Self {
            extractor,
            download_dir,
        }
    }

    /// Downloads `url` to `<download_dir>/<uuid>.<ext>`. On failure every file
    /// carrying that identifier is removed before the error is returned.
    pub async fn download(&self, url: &str) -> Result<DownloadedMedia, ExtractionError> {
        let id = Uuid::new_v4().to_string();
        tracing::info!("downloading {} as {}", url, id);

        match self.fetch(url, &id).await {
            Ok(media) => {
                tracing::info!("download {} finished: {}", id, media.file_path.display());
                Ok(media)
            }
            Err(e) => {
                tracing::warn!("download {} failed: {}", id, e);
                remove_artifacts(&self.download_dir, &id).await;
                Err(e)
            }
        }
    }

    async fn fetch(&self, url: &str, id: &str) -> Result<DownloadedMedia, ExtractionError> {
        tokio::fs::create_dir_all(&self.download_dir).await?;

        let template = self.download_dir.join(format!("{}.%(ext)s", id));
        let meta = self
            .extractor
            .download(url, &template, FORMAT_SELECTOR)
            .await?;

        let file_path = locate_output(&self.download_dir, id)
            .await?
            .ok_or(ExtractionError::FileNotFound)?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(DownloadedMedia {
            file_path,
            file_name,
            title: meta.title_or_default(),
            duration: meta.duration_secs(),
            thumbnail: meta.thumbnail_url(),
            platform: Platform::from_url(url),
        })
    }
}

/// The extractor may rewrite the extension after merging, so known
/// containers are probed first and the directory is scanned as a fallback.
async fn locate_output(dir: &Path, id: &str) -> Result<Option<PathBuf>, ExtractionError> {
    for ext in PROBE_EXTENSIONS {
        let candidate = dir.join(format!("{}.{}", id, ext));
        if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return Ok(Some(candidate));
        }
    }

    let prefix = format!("{}.", id);
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.starts_with(&prefix) || name.ends_with(".part") || name.ends_with(".ytdl") {
            continue;
        }
        if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
            return Ok(Some(entry.path()));
        }
    }

    Ok(None)
}

async fn remove_artifacts(dir: &Path, id: &str) {
    let prefix = format!("{}.", id);
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(_) => return,
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        if !entry.file_name().to_string_lossy().starts_with(&prefix) {
            continue;
        }
        if let Err(e) = tokio::fs::remove_file(entry.path()).await {
            tracing::debug!("could not remove {}: {}", entry.path().display(), e);
        }
    }
}
