//! CLI for versionator: fetch the engine build a project is associated with.

mod commands;
mod progress;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_builds, run_fetch};

/// Top-level CLI for versionator.
#[derive(Debug, Parser)]
#[command(name = "versionator")]
#[command(about = "Download and unpack the engine build a project is pinned to", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the engine build named by a project's EngineAssociation.
    Fetch(FetchArgs),

    /// List registered engine builds.
    Builds,
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Project descriptor, or a directory containing exactly one.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Project config file (default: `.versionator.toml` next to the descriptor).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bundle to fetch (default: project config, then `engine`).
    #[arg(long, value_name = "NAME")]
    pub bundle: Option<String>,

    /// Also fetch the debug symbols bundle.
    #[arg(long)]
    pub with_symbols: bool,

    /// Extract an existing local archive without checking it against the server.
    #[arg(long)]
    pub assume_valid: bool,

    /// Use UE5 binary names when checking for an installed build.
    #[arg(long)]
    pub ue5: bool,

    /// Where builds are stored; remembered in the user config.
    #[arg(long, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    /// Override the project's base_url.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Do not record the build in the build registry.
    #[arg(long)]
    pub no_register: bool,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Fetch(args) => run_fetch(args).await?,
            CliCommand::Builds => run_builds()?,
        }

        Ok(())
    }
}
