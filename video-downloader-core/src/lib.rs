pub mod core;
pub mod error;
pub mod fs_paths;
pub mod models;
pub mod platforms;

pub use error::ExtractionError;
pub use platforms::Platform;
