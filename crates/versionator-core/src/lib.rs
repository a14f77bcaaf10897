pub mod assets;
pub mod config;
pub mod descriptor;
pub mod downloader;
pub mod error;
pub mod extract;
pub mod fetch_head;
pub mod fetcher;
pub mod logging;
pub mod progress;
pub mod registry;
pub mod version;

pub use assets::{plan_assets, AssetSpec, DownloadOptions};
pub use error::{FetchError, Result};
pub use fetcher::{fetch_engine, FetchEnv, FetchReport};
pub use version::VersionTag;
