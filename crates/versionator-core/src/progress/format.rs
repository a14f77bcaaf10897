//! Human-readable byte sizes and rates (base 1000).

use std::time::Duration;

const UNIT: u64 = 1000;
const PREFIXES: &[u8] = b"KMGTPE";

/// `999` → `"999B"`, `1000` → `"1.0 KB"`, `1_500_000` → `"1.5 MB"`.
pub fn format_bytes(b: u64) -> String {
    scaled(b, "B")
}

/// Average rate of `bytes` over `elapsed`, e.g. `"1.0 KB/s"`.
pub fn format_byte_rate(bytes: u64, elapsed: Duration) -> String {
    // Clamp to one nanosecond so a zero elapsed time does not divide by zero.
    let secs = elapsed.as_secs_f64().max(1e-9);
    scaled((bytes as f64 / secs) as u64, "B/s")
}

fn scaled(b: u64, suffix: &str) -> String {
    if b < UNIT {
        return format!("{}{}", b, suffix);
    }
    let mut div = UNIT;
    let mut exp = 0usize;
    let mut n = b / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!(
        "{:.1} {}{}",
        b as f64 / div as f64,
        PREFIXES[exp] as char,
        suffix
    )
}
