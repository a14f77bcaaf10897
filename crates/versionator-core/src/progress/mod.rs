//! Progress reporting for downloads (bytes) and extraction (entries).
//!
//! Each transfer owns a [`TransferCounter`]; events flow to a shared
//! [`ProgressSink`] which may be called from several asset tasks at once.
//! Consumers can compute rate = done / elapsed and ETA = (total - done) / rate.

mod format;
mod throttle;

pub use format::{format_byte_rate, format_bytes};
pub use throttle::ProgressThrottle;

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Unit of a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressKind {
    /// Archive bytes received from the server.
    Bytes,
    /// Archive entries extracted.
    Entries,
}

/// Snapshot of one transfer's progress.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Asset label, e.g. `editor-symbols`.
    pub label: String,
    pub kind: ProgressKind,
    pub done: u64,
    /// Zero when unknown.
    pub total: u64,
    /// Time since the transfer started.
    pub elapsed: Duration,
}

impl ProgressEvent {
    /// Units per second (0 if elapsed is 0).
    pub fn per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.done as f64 / secs
    }

    /// Estimated seconds remaining (None if rate is 0 or the total is unknown).
    pub fn eta_secs(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Whole percent complete, 0 when the total is unknown.
    pub fn percent(&self) -> u64 {
        percent_of(self.done, self.total)
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done >= self.total
    }
}

fn percent_of(done: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0) as u64
}

/// Receives progress events. Must tolerate calls from concurrent asset tasks.
/// Purely observational: nothing in the pipeline depends on what a sink does.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _event: &ProgressEvent) {}
}

/// Logs progress through `tracing`.
///
/// Byte events arrive at most once per percent and are logged as they come.
/// Entry events arrive once per extracted entry and are throttled.
pub struct LogProgress {
    throttle: Mutex<ProgressThrottle>,
}

impl LogProgress {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            throttle: Mutex::new(ProgressThrottle::new(min_interval)),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl ProgressSink for LogProgress {
    fn report(&self, event: &ProgressEvent) {
        match event.kind {
            ProgressKind::Bytes => {
                tracing::info!(
                    "{} - {} / {} ({}%) {}",
                    event.label,
                    format_bytes(event.done),
                    format_bytes(event.total),
                    event.percent(),
                    format_byte_rate(event.done, event.elapsed)
                );
            }
            ProgressKind::Entries => {
                let emit = event.is_complete()
                    || self
                        .throttle
                        .lock()
                        .map(|mut t| t.should_emit())
                        .unwrap_or(true);
                if emit {
                    tracing::info!(
                        "{} - [{} / {} files] {:.0} files/s",
                        event.label,
                        event.done,
                        event.total,
                        event.per_sec()
                    );
                }
            }
        }
    }
}

/// Running counter for one transfer. Owned and mutated by a single task.
#[derive(Debug)]
pub struct TransferCounter {
    label: String,
    kind: ProgressKind,
    total: u64,
    done: u64,
    started_at: Instant,
    last_percent: u64,
}

impl TransferCounter {
    pub fn new(label: impl Into<String>, kind: ProgressKind, total: u64) -> Self {
        Self {
            label: label.into(),
            kind,
            total,
            done: 0,
            started_at: Instant::now(),
            last_percent: 0,
        }
    }

    pub fn done(&self) -> u64 {
        self.done
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Adds `n` units. Returns an event only when the whole percentage moved
    /// past the last reported one, so a multi-gigabyte copy yields at most ~100 events.
    pub fn advance(&mut self, n: u64) -> Option<ProgressEvent> {
        self.done += n;
        let percent = percent_of(self.done, self.total);
        if percent > self.last_percent {
            self.last_percent = percent;
            return Some(self.snapshot());
        }
        None
    }

    /// Adds one unit and always returns an event (used per extracted entry).
    pub fn tick(&mut self) -> ProgressEvent {
        self.done += 1;
        self.last_percent = percent_of(self.done, self.total);
        self.snapshot()
    }

    pub fn snapshot(&self) -> ProgressEvent {
        ProgressEvent {
            label: self.label.clone(),
            kind: self.kind,
            done: self.done,
            total: self.total,
            elapsed: self.started_at.elapsed(),
        }
    }
}
