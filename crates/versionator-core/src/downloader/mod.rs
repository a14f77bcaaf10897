//! Resumable download of one asset archive, followed by its extraction.
//!
//! The local archive lives next to the version directories
//! (`<root>/<asset>-<version>.7z`) so an interrupted run leaves a partial file
//! the next run can resume with a Range request. The archive is removed only
//! after a successful extraction.

mod transfer;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FetchError, Result};
use crate::extract::{self, ArchiveFormat, ARCHIVE_EXTENSION};
use crate::fetch_head;
use crate::progress::ProgressSink;

use transfer::{download_to, TransferOutcome};

/// One asset to fetch for a version.
#[derive(Debug, Clone, Copy)]
pub struct AssetRequest<'a> {
    /// Server directory holding the archives.
    pub base_url: &'a str,
    /// Download root; archives and version directories live here.
    pub root_dir: &'a Path,
    /// Bundle name, e.g. `engine-symbols`.
    pub asset: &'a str,
    /// Unprefixed version name, e.g. `5.3.0`.
    pub version: &'a str,
    /// Extract an existing archive without contacting the server.
    pub assume_valid: bool,
}

impl AssetRequest<'_> {
    pub fn url(&self) -> String {
        archive_url(self.base_url, self.asset, self.version)
    }

    pub fn archive_path(&self) -> PathBuf {
        archive_path(self.root_dir, self.asset, self.version)
    }

    /// Directory the archive extracts into.
    pub fn destination(&self) -> PathBuf {
        self.root_dir.join(self.version)
    }
}

/// `https://example.test/builds` + `editor` + `5.3.0` → `https://example.test/builds/editor-5.3.0.7z`.
pub fn archive_url(base_url: &str, asset: &str, version: &str) -> String {
    format!(
        "{}/{}-{}.{}",
        base_url.trim_end_matches('/'),
        asset,
        version,
        ARCHIVE_EXTENSION
    )
}

/// Local archive location; the same on every run so partial files are reused.
pub fn archive_path(root_dir: &Path, asset: &str, version: &str) -> PathBuf {
    root_dir.join(format!("{}-{}.{}", asset, version, ARCHIVE_EXTENSION))
}

/// Transfer attempts: a ranged resume may fall back once to a full download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Ranged(u64),
    Unranged,
}

impl Attempt {
    fn range_from(self) -> Option<u64> {
        match self {
            Attempt::Ranged(from) => Some(from),
            Attempt::Unranged => None,
        }
    }

    /// What to try after a 416; `None` means give up.
    fn after_range_not_satisfiable(self) -> Option<Attempt> {
        match self {
            Attempt::Ranged(_) => Some(Attempt::Unranged),
            Attempt::Unranged => None,
        }
    }
}

/// Downloads (or resumes) the asset archive and extracts it into
/// `<root>/<version>`. Blocking; run it on a blocking thread from async code.
pub fn fetch_asset(
    request: &AssetRequest<'_>,
    format: &dyn ArchiveFormat,
    progress: &dyn ProgressSink,
) -> Result<()> {
    let url = request.url();
    let archive = request.archive_path();
    let dest = request.destination();

    let mut attempt = Attempt::Unranged;
    if let Ok(meta) = fs::metadata(&archive) {
        let local = meta.len();
        if request.assume_valid {
            tracing::info!(asset = request.asset, "assuming {} is valid", archive.display());
            return install(request.asset, &archive, &dest, format, progress);
        }

        let head = fetch_head::probe(&url)?;
        if head.content_length == Some(local) {
            tracing::info!(asset = request.asset, bytes = local, "archive already downloaded");
            return install(request.asset, &archive, &dest, format, progress);
        }
        if head.accept_ranges {
            tracing::debug!(asset = request.asset, from = local, "resuming with range request");
            attempt = Attempt::Ranged(local);
        }
    }

    fs::create_dir_all(request.root_dir)?;
    loop {
        match download_to(&url, &archive, attempt.range_from(), request.asset, progress)? {
            TransferOutcome::Complete { status, bytes } => {
                tracing::debug!(asset = request.asset, status, bytes, "transfer finished");
                break;
            }
            TransferOutcome::RangeNotSatisfiable => match attempt.after_range_not_satisfiable() {
                Some(next) => {
                    tracing::info!("range not satisfiable, restarting {}", url);
                    attempt = next;
                }
                None => {
                    return Err(FetchError::RemoteError { status: 416, url });
                }
            },
        }
    }

    install(request.asset, &archive, &dest, format, progress)
}

/// Extracts and, only on success, removes the archive.
fn install(
    label: &str,
    archive: &Path,
    dest: &Path,
    format: &dyn ArchiveFormat,
    progress: &dyn ProgressSink,
) -> Result<()> {
    extract::extract(label, archive, dest, format, progress)?;
    fs::remove_file(archive)?;
    Ok(())
}
