//! Test archive format: a JSON list of entries, served and extracted like a `.7z`.
//!
//! Lets the integration tests build archives byte-for-byte without a 7z
//! writer, while still exercising download, resume and extraction end to end.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use versionator_core::extract::{ArchiveEntry, ArchiveFormat, ArchiveReader, EntryVisitor};
use versionator_core::FetchError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureEntry {
    pub name: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub dir: bool,
}

/// Serialized archive holding `files` (name, content) plus their parent directory.
pub fn build(files: &[(&str, &str)]) -> Vec<u8> {
    let mut entries = vec![FixtureEntry {
        name: "Engine".to_string(),
        data: String::new(),
        dir: true,
    }];
    entries.extend(files.iter().map(|(name, data)| FixtureEntry {
        name: name.to_string(),
        data: data.to_string(),
        dir: false,
    }));
    serde_json::to_vec_pretty(&entries).unwrap()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFormat;

impl ArchiveFormat for FixtureFormat {
    fn open(&self, path: &Path) -> versionator_core::Result<Box<dyn ArchiveReader>> {
        let data = fs::read(path)?;
        let entries: Vec<FixtureEntry> =
            serde_json::from_slice(&data).map_err(|e| FetchError::Archive {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Box::new(FixtureReader { entries }))
    }
}

struct FixtureReader {
    entries: Vec<FixtureEntry>,
}

impl ArchiveReader for FixtureReader {
    fn count(&mut self) -> versionator_core::Result<u64> {
        Ok(self.entries.len() as u64)
    }

    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> versionator_core::Result<()> {
        for e in &self.entries {
            let entry = ArchiveEntry {
                name: e.name.clone(),
                size: e.data.len() as u64,
                is_directory: e.dir,
                modified_at: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)),
                accessed_at: None,
            };
            let mut content: &[u8] = e.data.as_bytes();
            if visit(&entry, &mut content as &mut dyn Read).is_break() {
                break;
            }
        }
        Ok(())
    }
}
