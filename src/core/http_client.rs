use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use video_downloader_core::ExtractionError;

use crate::platforms::traits::PageFetcher;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers
}

/// Plain GET of a rendered page with browser-like headers.
pub struct ReqwestPageFetcher {
    client: reqwest::Client,
}

impl ReqwestPageFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .cookie_store(true)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for ReqwestPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, ExtractionError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractionError::Http(e.to_string()))?;

        let status = response.status();
        tracing::debug!("page fetch {} -> HTTP {}", url, status);

        if !status.is_success() {
            return Err(ExtractionError::Http(format!("HTTP {} for {}", status, url)));
        }

        response
            .text()
            .await
            .map_err(|e| ExtractionError::Http(e.to_string()))
    }
}
