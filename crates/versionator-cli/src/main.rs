use versionator_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Fall back to stderr if the state dir is unusable (read-only home, etc.).
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("versionator error: {:#}", err);
        std::process::exit(1);
    }
}
