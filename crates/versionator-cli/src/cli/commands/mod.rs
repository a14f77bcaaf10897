//! CLI command handlers, one per file.

mod builds;
mod fetch;

pub use builds::run_builds;
pub use fetch::run_fetch;
