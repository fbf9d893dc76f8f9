use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::platforms::Platform;

/// yt-dlp info dict, decoded once at the extractor boundary. Every field is
/// optional because flat listings, single videos and channel pages all fill
/// different subsets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaMetadata {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub webpage_url: Option<String>,
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
    pub description: Option<String>,
    pub channel_description: Option<String>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    pub fullname: Option<String>,
    pub biography: Option<String>,
    pub signature: Option<String>,
    pub entries: Option<Vec<Option<MediaMetadata>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thumbnail {
    pub url: Option<String>,
}

impl MediaMetadata {
    pub fn title_or_default(&self) -> String {
        self.title.clone().unwrap_or_default()
    }

    /// Whole seconds, 0 when missing or negative.
    pub fn duration_secs(&self) -> u64 {
        self.duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d as u64)
            .unwrap_or(0)
    }

    pub fn thumbnail_url(&self) -> String {
        self.thumbnail
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| self.thumbnails.iter().rev().find_map(|t| t.url.clone()))
            .unwrap_or_default()
    }

    /// Playlist entries, or the item itself when the extractor answered with
    /// a single video.
    pub fn into_entries(self) -> Vec<MediaMetadata> {
        match self.entries {
            Some(entries) => entries.into_iter().flatten().collect(),
            None => vec![self],
        }
    }

    pub fn resolve_url(&self, platform: Platform) -> Option<String> {
        let candidate = self
            .webpage_url
            .as_deref()
            .or(self.url.as_deref())
            .filter(|u| !u.is_empty());

        match candidate {
            Some(u) if u.starts_with("http://") || u.starts_with("https://") => Some(u.to_string()),
            _ => match (platform, self.id.as_deref()) {
                (Platform::YouTube, Some(id)) if !id.is_empty() => {
                    Some(format!("https://www.youtube.com/watch?v={}", id))
                }
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    pub url: String,
    pub title: String,
    pub duration: u64,
    pub thumbnail: String,
}

impl VideoDescriptor {
    pub fn from_metadata(meta: &MediaMetadata, platform: Platform) -> Option<Self> {
        let url = meta.resolve_url(platform)?;
        Some(Self {
            url,
            title: meta.title_or_default(),
            duration: meta.duration_secs(),
            thumbnail: meta.thumbnail_url(),
        })
    }

    pub fn placeholder(url: &str, title: &str) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            duration: 0,
            thumbnail: String::new(),
        }
    }
}

/// A finished download sitting in the download directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadedMedia {
    pub file_path: PathBuf,
    #[serde(rename = "filename")]
    pub file_name: String,
    pub title: String,
    pub duration: u64,
    pub thumbnail: String,
    pub platform: Platform,
}
