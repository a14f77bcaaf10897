//! Console progress lines for `versionator fetch`.

use std::sync::Mutex;
use std::time::Duration;
use versionator_core::progress::{
    format_byte_rate, format_bytes, ProgressEvent, ProgressKind, ProgressSink, ProgressThrottle,
};

const ENTRY_INTERVAL_MS: u64 = 500;

/// Prints one line per event. Byte events already arrive at most once per
/// percent; entry events are throttled here.
pub struct ConsoleProgress {
    entries: Mutex<ProgressThrottle>,
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self {
            entries: Mutex::new(ProgressThrottle::new(Duration::from_millis(ENTRY_INTERVAL_MS))),
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn report(&self, event: &ProgressEvent) {
        match event.kind {
            ProgressKind::Bytes => println!("  {}", byte_line(event)),
            ProgressKind::Entries => {
                let emit = event.is_complete()
                    || self
                        .entries
                        .lock()
                        .map(|mut t| t.should_emit())
                        .unwrap_or(true);
                if emit {
                    println!(
                        "  {} - [{} / {} files] {:.0} files/s",
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

fn byte_line(event: &ProgressEvent) -> String {
    let eta = event
        .eta_secs()
        .map(|s| format!("{:.0}s", s))
        .unwrap_or_else(|| "?".to_string());
    format!(
        "{} - {} / {} ({}%)  {}  ETA {}",
        event.label,
        format_bytes(event.done),
        format_bytes(event.total),
        event.percent(),
        format_byte_rate(event.done, event.elapsed),
        eta
    )
}
