//! Error type shared by the fetch pipeline.
//!
//! Per-asset failures carry enough context (URL, entry name, counts) to be
//! printed as-is by the CLI. Glue code around the pipeline uses `anyhow`.

use std::path::PathBuf;

/// Failure of a fetch, download or extraction step.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The engine association does not carry the `uev:` prefix (or names nothing usable).
    #[error("engine association {0:?} needs 'uev:' prefix followed by a build name")]
    InvalidVersionFormat(String),

    /// No project descriptor at the given path.
    #[error("no .uproject descriptor found at {}", .0.display())]
    DescriptorNotFound(PathBuf),

    /// A directory holds more than one project descriptor.
    #[error("{} contains {count} .uproject descriptors, expected exactly one", .dir.display())]
    DescriptorAmbiguous { dir: PathBuf, count: usize },

    /// The descriptor exists but is not a valid document.
    #[error("cannot parse {}: {reason}", .path.display())]
    DescriptorParseError { path: PathBuf, reason: String },

    /// The server answered with an error status.
    #[error("HTTP {status}: {url}")]
    RemoteError { status: u32, url: String },

    /// Curl could not complete the request (resolve, connect, reset, ...).
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Writing the archive to disk failed mid-transfer; the partial file is kept.
    #[error("transfer to {} failed: {reason}", .path.display())]
    TransferError { path: PathBuf, reason: String },

    /// An archive entry would land outside the destination directory.
    #[error("{entry}: illegal file path escapes destination")]
    PathTraversal { entry: String },

    /// Fewer entries were materialized than the archive listed.
    #[error("expected to extract {expected} items, only extracted {actual}")]
    ExtractionIncomplete { expected: u64, actual: u64 },

    /// The archive reader failed to open or decode the archive.
    #[error("archive {}: {reason}", .path.display())]
    Archive { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An asset task panicked or was aborted before reporting.
    #[error("fetch task for {asset} did not finish: {reason}")]
    TaskFailed { asset: String, reason: String },

    /// One or more assets failed; only the last failure (in plan order) is kept.
    #[error("{failed} of {attempted} asset fetches failed; last error: {source}")]
    Aggregate {
        failed: usize,
        attempted: usize,
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// The failure that caused this error, looking through [`FetchError::Aggregate`].
    pub fn root(&self) -> &FetchError {
        match self {
            FetchError::Aggregate { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T, E = FetchError> = std::result::Result<T, E>;
