//! One HTTP GET of an archive, streamed to the local archive file.
//!
//! The file is opened only once the response status is known: `200` creates
//! or truncates it, `206` appends to it. A single transfer never mixes both.

use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str;
use std::time::Duration;

use crate::error::{FetchError, Result};
use crate::fetch_head::{parse_headers, parse_status_line, ResponseHead};
use crate::progress::{ProgressKind, ProgressSink, TransferCounter};

/// How a GET ended when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TransferOutcome {
    /// Body fully written; `bytes` received in this transfer.
    Complete { status: u32, bytes: u64 },
    /// Server answered 416 to the requested range.
    RangeNotSatisfiable,
}

/// GETs `url` into `archive`, sending `Range: bytes=<from>-` when `range_from` is set.
/// Runs in the current thread.
pub(super) fn download_to(
    url: &str,
    archive: &Path,
    range_from: Option<u64>,
    label: &str,
    progress: &dyn ProgressSink,
) -> Result<TransferOutcome> {
    let network = |source: curl::Error| FetchError::Network {
        url: url.to_string(),
        source,
    };

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(network)?;
    easy.follow_location(true).map_err(network)?;
    easy.max_redirections(10).map_err(network)?;
    easy.fail_on_error(true).map_err(network)?;
    easy.connect_timeout(Duration::from_secs(30)).map_err(network)?;
    if let Some(from) = range_from {
        easy.range(&format!("{}-", from)).map_err(network)?;
    }

    // Header lines of the current response hop; reset at each status line.
    let lines: RefCell<Vec<String>> = RefCell::new(Vec::new());
    let mut body = BodySink {
        url,
        path: archive.to_path_buf(),
        range_from,
        label,
        progress,
        file: None,
        counter: None,
        error: None,
    };

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    let mut lines = lines.borrow_mut();
                    if parse_status_line(line).is_some() {
                        lines.clear();
                    }
                    lines.push(line.to_string());
                }
                true
            })
            .map_err(network)?;
        transfer
            .write_function(|data| Ok(body.write(&lines.borrow(), data)))
            .map_err(network)?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if let Some(local) = body.error.take() {
            return Err(local);
        }
        let code = easy.response_code().unwrap_or(0);
        return match code {
            416 => Ok(TransferOutcome::RangeNotSatisfiable),
            400.. => Err(FetchError::RemoteError {
                status: code,
                url: url.to_string(),
            }),
            _ => Err(network(e)),
        };
    }

    let code = easy.response_code().map_err(network)?;
    match code {
        416 => return Ok(TransferOutcome::RangeNotSatisfiable),
        400.. => {
            return Err(FetchError::RemoteError {
                status: code,
                url: url.to_string(),
            })
        }
        _ => {}
    }

    // Empty bodies never reach the write callback; still honour create/append.
    if body.file.is_none() {
        let head = parse_headers(&lines.borrow());
        body.open(&head)?;
    }
    body.finish()?;

    let bytes = body.counter.as_ref().map_or(0, TransferCounter::done);
    tracing::debug!(url, code, bytes, "GET complete");
    Ok(TransferOutcome::Complete {
        status: code,
        bytes,
    })
}

/// Destination of the response body.
struct BodySink<'a> {
    url: &'a str,
    path: PathBuf,
    range_from: Option<u64>,
    label: &'a str,
    progress: &'a dyn ProgressSink,
    file: Option<File>,
    counter: Option<TransferCounter>,
    /// Local failure that made the write callback abort the transfer.
    error: Option<FetchError>,
}

impl BodySink<'_> {
    /// Write callback body. Returning fewer bytes than given aborts the transfer.
    fn write(&mut self, lines: &[String], data: &[u8]) -> usize {
        if self.file.is_none() {
            let head = parse_headers(lines);
            if let Err(e) = self.open(&head) {
                self.error = Some(e);
                return 0;
            }
        }
        let Some(file) = self.file.as_mut() else {
            return 0;
        };
        if let Err(e) = file.write_all(data) {
            self.error = Some(self.transfer_error(e.to_string()));
            return 0;
        }
        if let Some(counter) = self.counter.as_mut() {
            if let Some(event) = counter.advance(data.len() as u64) {
                self.progress.report(&event);
            }
        }
        data.len()
    }

    /// Opens the archive according to the response: full content truncates,
    /// partial content appends at the offset that was asked for.
    fn open(&mut self, head: &ResponseHead) -> Result<()> {
        let file = match head.status {
            Some(206) => {
                if self.range_from.is_none() || head.content_range_start != self.range_from {
                    return Err(self.transfer_error(format!(
                        "partial content starts at {:?}, requested {:?}",
                        head.content_range_start, self.range_from
                    )));
                }
                tracing::info!("Resuming {}", self.url);
                OpenOptions::new().append(true).open(&self.path)
            }
            _ => {
                tracing::info!("Fetching {}", self.url);
                File::create(&self.path)
            }
        }
        .map_err(|e| self.transfer_error(e.to_string()))?;

        self.file = Some(file);
        self.counter = Some(TransferCounter::new(
            self.label,
            ProgressKind::Bytes,
            head.content_length.unwrap_or(0),
        ));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush().map_err(|e| FetchError::TransferError {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    fn transfer_error(&self, reason: String) -> FetchError {
        FetchError::TransferError {
            path: self.path.clone(),
            reason,
        }
    }
}
