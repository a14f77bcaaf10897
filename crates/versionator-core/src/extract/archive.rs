//! Archive reader seam: what the extractor needs from an archive format.

use std::io::Read;
use std::ops::ControlFlow;
use std::path::Path;
use std::time::SystemTime;

use crate::error::Result;

/// Metadata of one archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Archive-relative path, `/`-separated.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    pub is_directory: bool,
    pub modified_at: Option<SystemTime>,
    pub accessed_at: Option<SystemTime>,
}

/// Visitor called once per entry with the entry's content stream.
/// Returning `ControlFlow::Break` stops iteration early.
pub type EntryVisitor<'a> = dyn FnMut(&ArchiveEntry, &mut dyn Read) -> ControlFlow<()> + 'a;

/// An opened archive that can be walked entry by entry.
pub trait ArchiveReader {
    /// Number of entries listed by the archive.
    fn count(&mut self) -> Result<u64>;

    /// Visits entries in archive order. Returning normally means the entry
    /// list was exhausted (or the visitor broke out); read errors are `Err`.
    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<()>;
}

/// Opens archives of one format. Shared between asset tasks.
pub trait ArchiveFormat: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveReader>>;
}
