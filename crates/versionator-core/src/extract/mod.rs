//! Streaming archive extraction into a destination tree.
//!
//! Every entry path is checked against the destination before anything is
//! written (zip-slip). Files whose on-disk size already matches the entry are
//! left alone, which makes re-running an interrupted extraction cheap. There
//! is no content hashing and no rollback of partially extracted trees.

mod archive;
mod path;
mod sevenz;

pub use archive::{ArchiveEntry, ArchiveFormat, ArchiveReader, EntryVisitor};
pub use path::{clean, contained_path};
pub use sevenz::{SevenZip, ARCHIVE_EXTENSION};

use std::fs::{self, File};
use std::io::{self, Read};
use std::ops::ControlFlow;
use std::path::Path;

use filetime::FileTime;

use crate::error::{FetchError, Result};
use crate::progress::{ProgressKind, ProgressSink, TransferCounter};

/// Extracts every entry of `archive_path` under `dest`. Returns the number of
/// entries processed (written, skipped as unchanged, or directories created).
///
/// The archive is opened twice: once to count entries for progress and
/// reconciliation, once to materialize them. If counting fails the total
/// degrades to zero, so any archive with entries ends in
/// [`FetchError::ExtractionIncomplete`] and is kept for another attempt.
pub fn extract(
    label: &str,
    archive_path: &Path,
    dest: &Path,
    format: &dyn ArchiveFormat,
    progress: &dyn ProgressSink,
) -> Result<u64> {
    let expected = match format.open(archive_path).and_then(|mut r| r.count()) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(archive = %archive_path.display(), "cannot count entries: {}", e);
            0
        }
    };

    tracing::info!("Extracting {}", archive_path.display());

    let mut reader = format.open(archive_path)?;
    let mut counter = TransferCounter::new(label, ProgressKind::Entries, expected);
    let mut failure: Option<FetchError> = None;

    let walk = reader.for_each_entry(&mut |entry: &ArchiveEntry, content: &mut dyn Read| {
        match materialize(dest, entry, content) {
            Ok(()) => {
                progress.report(&counter.tick());
                ControlFlow::Continue(())
            }
            Err(e) => {
                failure = Some(e);
                ControlFlow::Break(())
            }
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }
    walk?;

    let actual = counter.done();
    if expected != actual {
        return Err(FetchError::ExtractionIncomplete { expected, actual });
    }
    tracing::info!(label, entries = actual, "extracted {}", archive_path.display());
    Ok(actual)
}

/// Writes one entry under `dest`.
fn materialize(dest: &Path, entry: &ArchiveEntry, content: &mut dyn Read) -> Result<()> {
    let target = contained_path(dest, &entry.name).ok_or_else(|| FetchError::PathTraversal {
        entry: entry.name.clone(),
    })?;

    if entry.is_directory {
        fs::create_dir_all(&target)?;
        return Ok(());
    }

    if let Ok(meta) = fs::metadata(&target) {
        if meta.is_file() && meta.len() == entry.size {
            // Unchanged by size: skip the rewrite but keep the reader in step.
            io::copy(content, &mut io::sink())?;
            return Ok(());
        }
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(&target)?;
    io::copy(content, &mut file)?;
    drop(file);

    restore_times(&target, entry);
    Ok(())
}

/// Applies the entry's recorded timestamps. Access time falls back to the
/// modification time when the archive did not record one. Failures are
/// logged only: the content is already in place.
fn restore_times(target: &Path, entry: &ArchiveEntry) {
    let Some(modified) = entry.modified_at else {
        return;
    };
    let mtime = FileTime::from_system_time(modified);
    let atime = entry
        .accessed_at
        .map(FileTime::from_system_time)
        .unwrap_or(mtime);
    if let Err(e) = filetime::set_file_times(target, atime, mtime) {
        tracing::warn!(path = %target.display(), "cannot set file times: {}", e);
    }
}
