//! Project descriptor (`.uproject`) lookup and engine association.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FetchError, Result};
use crate::version::VersionTag;

/// File extension of project descriptors.
pub const DESCRIPTOR_EXTENSION: &str = "uproject";

#[derive(Debug, Deserialize)]
struct Descriptor {
    #[serde(rename = "EngineAssociation")]
    engine_association: String,
}

/// Resolves `path` to a descriptor file: either `path` itself, or the single
/// `.uproject` inside the directory `path`.
pub fn find_descriptor(path: &Path) -> Result<PathBuf> {
    let meta = fs::metadata(path).map_err(|_| FetchError::DescriptorNotFound(path.to_path_buf()))?;
    if !meta.is_dir() {
        return Ok(path.to_path_buf());
    }

    let mut found: Vec<PathBuf> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == DESCRIPTOR_EXTENSION))
        .collect();
    match found.len() {
        0 => Err(FetchError::DescriptorNotFound(path.to_path_buf())),
        1 => Ok(found.remove(0)),
        count => Err(FetchError::DescriptorAmbiguous {
            dir: path.to_path_buf(),
            count,
        }),
    }
}

/// Reads the raw `EngineAssociation` string from a descriptor file.
pub fn read_engine_association(descriptor: &Path) -> Result<String> {
    let data = fs::read_to_string(descriptor)
        .map_err(|_| FetchError::DescriptorNotFound(descriptor.to_path_buf()))?;
    let parsed: Descriptor =
        serde_json::from_str(&data).map_err(|e| FetchError::DescriptorParseError {
            path: descriptor.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(parsed.engine_association)
}

/// Finds the descriptor at `path` and returns its validated engine association.
pub fn engine_association(path: &Path) -> Result<VersionTag> {
    let descriptor = find_descriptor(path)?;
    let raw = read_engine_association(&descriptor)?;
    tracing::debug!(descriptor = %descriptor.display(), association = %raw, "read engine association");
    VersionTag::parse(&raw)
}
