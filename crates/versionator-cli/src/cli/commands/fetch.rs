//! `versionator fetch` – download and extract the build a project is associated with.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use versionator_core::config::{self, ProjectConfig, PROJECT_CONFIG_FILE};
use versionator_core::descriptor;
use versionator_core::registry::{self, BuildRegistry};
use versionator_core::{fetch_engine, DownloadOptions, FetchEnv};

use crate::cli::progress::ConsoleProgress;
use crate::cli::FetchArgs;

pub async fn run_fetch(args: FetchArgs) -> Result<()> {
    let descriptor_path = descriptor::find_descriptor(&args.path)?;
    let project_dir = project_dir(&descriptor_path);
    let tag = descriptor::engine_association(&descriptor_path)?;
    tracing::info!(descriptor = %descriptor_path.display(), "project uses {}", tag);

    let project_cfg_path = args
        .config
        .clone()
        .unwrap_or_else(|| project_dir.join(PROJECT_CONFIG_FILE));
    let project_cfg = ProjectConfig::load(&project_cfg_path)?;
    let base_url = match args.base_url.as_deref() {
        Some(url) => url.to_string(),
        None => project_cfg.require_base_url(&project_cfg_path)?.to_string(),
    };

    let user_cfg_path = config::config_path()?;
    let mut user_cfg = config::load_or_init_at(&user_cfg_path)?;
    let download_dir =
        config::resolve_download_dir(args.download_dir.as_deref(), &user_cfg, &project_dir)?;
    if user_cfg.download_dir.as_deref() != Some(download_dir.as_path()) {
        user_cfg.download_dir = Some(download_dir.clone());
        config::save_at(&user_cfg_path, &user_cfg)
            .with_context(|| format!("saving {}", user_cfg_path.display()))?;
    }
    println!("Download directory: {}", download_dir.display());

    let options = download_options(&args, &project_cfg);
    let env = FetchEnv::default().with_progress(Arc::new(ConsoleProgress::default()));
    let report = fetch_engine(&download_dir, &base_url, tag.as_str(), options, &env).await?;
    let destination = report
        .into_result()
        .with_context(|| format!("fetching {} into {}", tag, download_dir.display()))?;

    if !args.no_register {
        registry::register_build(&BuildRegistry::default_path()?, tag.as_str(), &destination)?;
    }
    println!("{}", destination.display());
    Ok(())
}

/// Command-line flags win over the project config; a flag can only turn UE5 naming on.
fn download_options(args: &FetchArgs, project: &ProjectConfig) -> DownloadOptions {
    let defaults = DownloadOptions::default();
    DownloadOptions {
        bundle_name: args
            .bundle
            .clone()
            .or_else(|| project.bundle.clone())
            .unwrap_or(defaults.bundle_name),
        fetch_symbols: args.with_symbols,
        assume_valid: args.assume_valid,
        target_major_version_compat: args.ue5 || project.ue5,
    }
}

/// Directory holding the descriptor; `.` for a bare file name.
fn project_dir(descriptor_path: &Path) -> PathBuf {
    match descriptor_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn fetch_args(argv: &[&str]) -> FetchArgs {
        match crate::cli::Cli::try_parse_from(argv).unwrap().command {
            crate::cli::CliCommand::Fetch(args) => args,
            other => panic!("expected Fetch, got {:?}", other),
        }
    }

    #[test]
    fn flags_override_project_config() {
        let project = ProjectConfig {
            base_url: Some("https://builds.example.test".to_string()),
            bundle: Some("editor".to_string()),
            ue5: false,
        };
        let opts = download_options(
            &fetch_args(&["versionator", "fetch", "--bundle", "engine", "--ue5"]),
            &project,
        );
        assert_eq!(opts.bundle_name, "engine");
        assert!(opts.target_major_version_compat);

        let opts = download_options(&fetch_args(&["versionator", "fetch"]), &project);
        assert_eq!(opts.bundle_name, "editor");
        assert!(!opts.fetch_symbols);
    }

    #[test]
    fn defaults_without_project_config() {
        let opts = download_options(
            &fetch_args(&["versionator", "fetch", "--with-symbols", "--assume-valid"]),
            &ProjectConfig::default(),
        );
        assert_eq!(opts.bundle_name, "engine");
        assert!(opts.fetch_symbols);
        assert!(opts.assume_valid);
    }

    #[test]
    fn project_dir_of_descriptor() {
        assert_eq!(
            project_dir(Path::new("/work/Shooter/Shooter.uproject")),
            PathBuf::from("/work/Shooter")
        );
        assert_eq!(project_dir(Path::new("Shooter.uproject")), PathBuf::from("."));
    }
}
