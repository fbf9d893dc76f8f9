use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "video-downloader";

pub trait ServicePaths: Send + Sync {
    fn downloads_dir(&self) -> PathBuf;
    fn bin_dir(&self) -> Option<PathBuf>;
}

pub struct DefaultPaths;

impl ServicePaths for DefaultPaths {
    /// Shared scratch directory; downloads accumulate here until purged
    /// externally.
    fn downloads_dir(&self) -> PathBuf {
        std::env::temp_dir().join("video_downloader")
    }

    fn bin_dir(&self) -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR_NAME).join("bin"))
    }
}
