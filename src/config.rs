use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use video_downloader_core::fs_paths::{DefaultPaths, ServicePaths};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub download_dir: PathBuf,
    /// Explicit yt-dlp binary. When unset it is located or installed at startup.
    pub ytdlp_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid PORT value: {}", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            download_dir: get("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| DefaultPaths.downloads_dir()),
            ytdlp_path: get("YTDLP_PATH").map(PathBuf::from),
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
