//! Fetch every bundle of an engine version into `<root>/<name>`.
//!
//! One blocking task per enabled, not-yet-installed asset; all of them are
//! joined before returning, whatever their outcome. Assets share only the
//! progress sink and the archive format.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::{plan_assets, AssetSpec, DownloadOptions};
use crate::downloader::{fetch_asset, AssetRequest};
use crate::error::{FetchError, Result};
use crate::extract::{ArchiveFormat, SevenZip};
use crate::progress::{LogProgress, ProgressSink};
use crate::version::VersionTag;

/// Collaborators the pipeline reports to and reads archives with.
#[derive(Clone)]
pub struct FetchEnv {
    pub progress: Arc<dyn ProgressSink>,
    pub archives: Arc<dyn ArchiveFormat>,
}

impl Default for FetchEnv {
    fn default() -> Self {
        Self {
            progress: Arc::new(LogProgress::default()),
            archives: Arc::new(SevenZip),
        }
    }
}

impl FetchEnv {
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_archives(mut self, archives: Arc<dyn ArchiveFormat>) -> Self {
        self.archives = archives;
        self
    }
}

/// Outcome of a fetch that passed validation.
///
/// `destination` is always set; `error` being `Some` means the install may be
/// incomplete. Deciding whether to use the build anyway is up to the caller.
#[derive(Debug)]
pub struct FetchReport {
    pub destination: PathBuf,
    pub error: Option<FetchError>,
}

impl FetchReport {
    pub fn into_result(self) -> Result<PathBuf> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.destination),
        }
    }
}

/// Fetches the bundles `options` asks for of engine association `version`.
///
/// Fails early with [`FetchError::InvalidVersionFormat`] before any disk or
/// network access. Assets whose sentinel file already exists are skipped
/// without a request. When several assets fail, only the last one (in plan
/// order) is reported, wrapped in [`FetchError::Aggregate`].
pub async fn fetch_engine(
    root_dir: &Path,
    base_url: &str,
    version: &str,
    options: DownloadOptions,
    env: &FetchEnv,
) -> Result<FetchReport> {
    let tag = VersionTag::parse(version)?;
    let destination = root_dir.join(tag.name());

    let pending: Vec<AssetSpec> = plan_assets(&options, &destination)
        .into_iter()
        .filter(|asset| asset.enabled)
        .filter(|asset| {
            let installed = asset.is_installed();
            if installed {
                tracing::info!(
                    asset = %asset.name,
                    sentinel = %asset.sentinel().display(),
                    "already installed, skipping"
                );
            }
            !installed
        })
        .collect();

    let attempted = pending.len();
    let mut handles = Vec::with_capacity(attempted);
    for asset in &pending {
        let root_dir = root_dir.to_path_buf();
        let base_url = base_url.to_string();
        let name = tag.name().to_string();
        let asset_name = asset.name.clone();
        let assume_valid = options.assume_valid;
        let env = env.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let request = AssetRequest {
                base_url: &base_url,
                root_dir: &root_dir,
                asset: &asset_name,
                version: &name,
                assume_valid,
            };
            fetch_asset(&request, env.archives.as_ref(), env.progress.as_ref())
        }));
    }

    // Every task is awaited, in plan order, even after a failure.
    let mut failed = 0usize;
    let mut last: Option<FetchError> = None;
    for (asset, handle) in pending.iter().zip(handles) {
        let outcome = handle.await.unwrap_or_else(|e| {
            Err(FetchError::TaskFailed {
                asset: asset.name.clone(),
                reason: e.to_string(),
            })
        });
        match outcome {
            Ok(()) => tracing::info!(asset = %asset.name, "installed into {}", destination.display()),
            Err(e) => {
                failed += 1;
                tracing::warn!(asset = %asset.name, "fetch failed: {}", e);
                last = Some(e);
            }
        }
    }

    let error = last.map(|source| FetchError::Aggregate {
        failed,
        attempted,
        source: Box::new(source),
    });
    Ok(FetchReport { destination, error })
}
