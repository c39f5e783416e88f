pub mod config;
pub mod download;
pub mod error;
pub mod fetch;
pub mod hls;
pub mod merge;

pub use download::Downloader;
pub use error::Error;
pub use merge::Merger;
pub type Result<T> = std::result::Result<T, Error>;
