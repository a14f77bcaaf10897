//! 7z archives via the `sevenz-rust` crate.

use std::fs::File;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use sevenz_rust::{Password, SevenZArchiveEntry, SevenZReader};

use super::archive::{ArchiveEntry, ArchiveFormat, ArchiveReader, EntryVisitor};
use crate::error::{FetchError, Result};

/// File extension of build archives on the server and on disk.
pub const ARCHIVE_EXTENSION: &str = "7z";

/// The production archive format.
#[derive(Debug, Default, Clone, Copy)]
pub struct SevenZip;

impl ArchiveFormat for SevenZip {
    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveReader>> {
        let reader = SevenZReader::open(path, Password::empty()).map_err(|e| archive_error(path, e))?;
        Ok(Box::new(SevenZipReader {
            path: path.to_path_buf(),
            reader,
        }))
    }
}

struct SevenZipReader {
    path: PathBuf,
    reader: SevenZReader<File>,
}

impl ArchiveReader for SevenZipReader {
    fn count(&mut self) -> Result<u64> {
        Ok(self.reader.archive().files.len() as u64)
    }

    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<()> {
        let path = &self.path;
        self.reader
            .for_each_entries(|entry: &SevenZArchiveEntry, content: &mut dyn std::io::Read| {
                let entry = to_entry(entry);
                Ok(matches!(visit(&entry, content), ControlFlow::Continue(())))
            })
            .map_err(|e| archive_error(path, e))
    }
}

fn to_entry(entry: &SevenZArchiveEntry) -> ArchiveEntry {
    ArchiveEntry {
        name: entry.name().to_string(),
        size: entry.size(),
        is_directory: entry.is_directory(),
        modified_at: entry
            .has_last_modified_date
            .then(|| SystemTime::from(entry.last_modified_date())),
        accessed_at: entry
            .has_access_date
            .then(|| SystemTime::from(entry.access_date())),
    }
}

fn archive_error(path: &Path, e: sevenz_rust::Error) -> FetchError {
    FetchError::Archive {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}
