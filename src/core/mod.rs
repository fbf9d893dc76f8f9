pub mod http_client;
pub mod media_fetcher;
pub mod process;
pub mod profile;
pub mod registry;
pub mod ytdlp;
