use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

pub mod api;
pub mod config;
pub mod core;
pub mod platforms;

#[cfg(test)]
pub(crate) mod testing;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::core::http_client::{ReqwestPageFetcher, PAGE_TIMEOUT};
use crate::core::media_fetcher::MediaFetcher;
use crate::core::profile::ProfileService;
use crate::core::ytdlp::{self, YtdlpExtractor};

async fn resolve_ytdlp(config: &AppConfig) -> PathBuf {
    if let Some(path) = &config.ytdlp_path {
        return path.clone();
    }

    match ytdlp::ensure_ytdlp().await {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("yt-dlp unavailable, requests will fail until it is installed: {}", e);
            PathBuf::from(ytdlp::bin_name())
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    tokio::fs::create_dir_all(&config.download_dir)
        .await
        .with_context(|| format!("cannot create {}", config.download_dir.display()))?;

    let binary = resolve_ytdlp(&config).await;
    tracing::info!("using yt-dlp at {}", binary.display());

    let extractor = Arc::new(YtdlpExtractor::new(binary));
    let pages = Arc::new(ReqwestPageFetcher::new(PAGE_TIMEOUT)?);
    let state = AppState::new(
        MediaFetcher::new(extractor.clone(), config.download_dir.clone()),
        ProfileService::new(extractor, pages),
    );

    let addr = config.socket_addr()?;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == ErrorKind::AddrInUse => {
            tracing::error!(
                "port {} is already in use; pick another one, e.g. PORT={} video-downloader",
                config.port,
                config.port.wrapping_add(1)
            );
            std::process::exit(1);
        }
        Err(e) => return Err(e).with_context(|| format!("cannot bind {}", addr)),
    };

    tracing::info!(
        "video-downloader listening on {}, downloads in {}",
        addr,
        config.download_dir.display()
    );
    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
