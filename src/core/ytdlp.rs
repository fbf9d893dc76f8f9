use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use video_downloader_core::fs_paths::{DefaultPaths, ServicePaths};
use video_downloader_core::models::media::MediaMetadata;
use video_downloader_core::ExtractionError;

use crate::core::process;
use crate::platforms::traits::MediaExtractor;

pub fn bin_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    }
}

const RELEASE_BASE: &str = "https://github.com/yt-dlp/yt-dlp/releases/latest/download";
const INSTALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Version string reported by `binary`, or `None` when it cannot be run.
async fn ytdlp_version(binary: &Path) -> Option<String> {
    let output = process::command(binary)
        .arg("--version")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}

/// First working yt-dlp: the one on `PATH`, then the managed copy.
pub async fn find_ytdlp() -> Option<PathBuf> {
    let candidates = std::iter::once(PathBuf::from(bin_name())).chain(managed_ytdlp_path());
    for candidate in candidates {
        if let Some(version) = ytdlp_version(&candidate).await {
            tracing::debug!("found yt-dlp {} at {}", version, candidate.display());
            return Some(candidate);
        }
    }
    None
}

fn managed_ytdlp_path() -> Option<PathBuf> {
    Some(DefaultPaths.bin_dir()?.join(bin_name()))
}

fn release_asset() -> &'static str {
    if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else if cfg!(target_os = "macos") {
        "yt-dlp_macos"
    } else {
        "yt-dlp"
    }
}

fn release_url(asset: &str) -> String {
    format!("{}/{}", RELEASE_BASE, asset)
}

/// Finds yt-dlp on `PATH` or in the managed bin dir, installing the latest
/// release there when neither works.
pub async fn ensure_ytdlp() -> anyhow::Result<PathBuf> {
    if let Some(path) = find_ytdlp().await {
        return Ok(path);
    }

    let target = managed_ytdlp_path()
        .ok_or_else(|| anyhow::anyhow!("no data directory to install yt-dlp into"))?;
    install_ytdlp(&target).await?;
    Ok(target)
}

/// Downloads the release binary next to `target`, moves it into place and
/// refuses to keep it unless it answers `--version`.
async fn install_ytdlp(target: &Path) -> anyhow::Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| anyhow::anyhow!("invalid install path {}", target.display()))?;
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("cannot create {}", dir.display()))?;

    let url = release_url(release_asset());
    tracing::info!("installing yt-dlp from {} into {}", url, target.display());

    let client = reqwest::Client::builder().timeout(INSTALL_TIMEOUT).build()?;
    let response = client.get(&url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;

    let staging = dir.join(format!("{}.download", bin_name()));
    tokio::fs::write(&staging, &bytes)
        .await
        .with_context(|| format!("cannot write {}", staging.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&staging, std::fs::Permissions::from_mode(0o755)).await?;
    }
    tokio::fs::rename(&staging, target).await?;

    match ytdlp_version(target).await {
        Some(version) => {
            tracing::info!("installed yt-dlp {} ({} bytes)", version, bytes.len());
            Ok(())
        }
        None => {
            let _ = tokio::fs::remove_file(target).await;
            anyhow::bail!("downloaded yt-dlp at {} does not run", target.display())
        }
    }
}

/// [`MediaExtractor`] backed by the yt-dlp command line.
pub struct YtdlpExtractor {
    binary: PathBuf,
}

impl YtdlpExtractor {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    async fn run_json(&self, args: Vec<String>) -> Result<MediaMetadata, ExtractionError> {
        tracing::debug!("running {} {}", self.binary.display(), args.join(" "));

        let output = process::command(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(ExtractionError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::failed(error_message(&stderr, output.status)));
        }

        parse_json_output(&output.stdout)
    }
}

#[async_trait]
impl MediaExtractor for YtdlpExtractor {
    async fn download(
        &self,
        url: &str,
        output_template: &Path,
        format_selector: &str,
    ) -> Result<MediaMetadata, ExtractionError> {
        self.run_json(download_args(url, output_template, format_selector))
            .await
    }

    async fn flat_listing(
        &self,
        url: &str,
        max_entries: usize,
    ) -> Result<MediaMetadata, ExtractionError> {
        self.run_json(flat_listing_args(url, max_entries)).await
    }

    async fn metadata(&self, url: &str) -> Result<MediaMetadata, ExtractionError> {
        self.run_json(metadata_args(url)).await
    }
}

fn download_args(url: &str, output_template: &Path, format_selector: &str) -> Vec<String> {
    vec![
        "-f".to_string(),
        format_selector.to_string(),
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "--no-progress".to_string(),
        "--dump-json".to_string(),
        "--no-simulate".to_string(),
        "-o".to_string(),
        output_template.to_string_lossy().to_string(),
        url.to_string(),
    ]
}

fn flat_listing_args(url: &str, max_entries: usize) -> Vec<String> {
    vec![
        "--flat-playlist".to_string(),
        "--dump-single-json".to_string(),
        "--no-warnings".to_string(),
        "--playlist-end".to_string(),
        max_entries.max(1).to_string(),
        url.to_string(),
    ]
}

/// Channel pages would otherwise resolve every entry; one is enough for the
/// channel-level fields.
fn metadata_args(url: &str) -> Vec<String> {
    vec![
        "--dump-single-json".to_string(),
        "--no-warnings".to_string(),
        "--playlist-end".to_string(),
        "1".to_string(),
        url.to_string(),
    ]
}

fn error_message(stderr: &str, status: std::process::ExitStatus) -> String {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| l.starts_with("ERROR:"))
        .map(|l| l.to_string())
        .unwrap_or_else(|| {
            let trimmed = stderr.trim();
            if trimmed.is_empty() {
                format!("yt-dlp exited with {}", status)
            } else {
                trimmed.to_string()
            }
        })
}

/// yt-dlp prints one JSON document per line; the last one describes the
/// requested URL.
fn parse_json_output(stdout: &[u8]) -> Result<MediaMetadata, ExtractionError> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| ExtractionError::failed("yt-dlp produced no output"))?;

    Ok(serde_json::from_str(line)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_url_points_at_latest_asset() {
        assert_eq!(
            release_url("yt-dlp"),
            "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp"
        );
        assert!(release_asset().starts_with("yt-dlp"));
    }

    #[tokio::test]
    async fn version_of_unrunnable_binary_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ytdlp_version(&dir.path().join("missing")).await.is_none());

        let not_executable = dir.path().join("yt-dlp");
        std::fs::write(&not_executable, b"not a program").unwrap();
        assert!(ytdlp_version(&not_executable).await.is_none());
    }

    #[test]
    fn download_args_keep_template_and_format() {
        let args = download_args(
            "https://youtu.be/abc",
            Path::new("/tmp/dl/1234.%(ext)s"),
            "best",
        );
        let pos = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[pos + 1], "/tmp/dl/1234.%(ext)s");
        assert_eq!(args[1], "best");
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc");
        assert!(args.contains(&"--no-simulate".to_string()));
    }

    #[test]
    fn flat_listing_caps_window() {
        let args = flat_listing_args("https://www.tiktok.com/@a", 6);
        let pos = args.iter().position(|a| a == "--playlist-end").unwrap();
        assert_eq!(args[pos + 1], "6");
        assert!(args.contains(&"--flat-playlist".to_string()));

        let args = flat_listing_args("https://www.tiktok.com/@a", 0);
        assert!(args.contains(&"1".to_string()));
    }

    #[test]
    fn metadata_is_not_flat() {
        let args = metadata_args("https://www.youtube.com/@a");
        assert!(!args.contains(&"--flat-playlist".to_string()));
    }

    #[test]
    fn parses_last_json_line() {
        let out = b"{\"title\":\"first\"}\n{\"title\":\"second\",\"duration\":5}\n\n";
        let meta = parse_json_output(out).unwrap();
        assert_eq!(meta.title.as_deref(), Some("second"));
        assert_eq!(meta.duration_secs(), 5);
    }

    #[test]
    fn empty_output_is_an_error() {
        assert!(matches!(
            parse_json_output(b"  \n"),
            Err(ExtractionError::Failed { .. })
        ));
        assert!(matches!(
            parse_json_output(b"not json"),
            Err(ExtractionError::InvalidOutput(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn error_message_prefers_error_line() {
        use std::os::unix::process::ExitStatusExt;
        let status = std::process::ExitStatus::from_raw(256);
        let stderr =
            "WARNING: something\nERROR: [instagram] user: Requested content is not available\n";
        assert_eq!(
            error_message(stderr, status),
            "ERROR: [instagram] user: Requested content is not available"
        );
        assert!(error_message("", status).starts_with("yt-dlp exited with"));
    }
}
