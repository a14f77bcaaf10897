use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the per-project configuration, next to the `.uproject`.
pub const PROJECT_CONFIG_FILE: &str = ".versionator.toml";

/// Per-project settings, committed with the project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Server directory holding `<bundle>-<version>.7z` archives.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Default bundle to fetch when none is given on the command line.
    #[serde(default)]
    pub bundle: Option<String>,
    /// Project targets UE5 binary naming.
    #[serde(default)]
    pub ue5: bool,
}

impl ProjectConfig {
    /// Loads `path` if it exists; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cfg: ProjectConfig =
            toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg)
    }

    /// The base URL, or an error naming the file it should come from.
    pub fn require_base_url(&self, path: &Path) -> Result<&str> {
        match self.base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url.trim()),
            _ => anyhow::bail!("{} config file has no base_url setting", path.display()),
        }
    }
}

/// Per-user settings loaded from `~/.config/versionator/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Where engine builds are downloaded and extracted.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("versionator")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Default download root when the user has not chosen one.
pub fn default_download_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("versionator")?;
    Ok(xdg_dirs.get_data_home().join("versionator").join("builds"))
}

/// Load user configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UserConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        let default_cfg = UserConfig::default();
        save_at(path, &default_cfg)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: UserConfig = toml::from_str(&data)?;
    Ok(cfg)
}

pub fn save_at(path: &Path, cfg: &UserConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml)?;
    Ok(())
}

/// Picks the download root: explicit choice, then the user config, then the
/// default. Rejects roots inside the project, which would end up in the
/// project's source tree.
pub fn resolve_download_dir(
    explicit: Option<&Path>,
    user: &UserConfig,
    project_dir: &Path,
) -> Result<PathBuf> {
    let chosen = match explicit.or(user.download_dir.as_deref()) {
        Some(dir) => dir.to_path_buf(),
        None => default_download_dir()?,
    };
    let chosen = std::path::absolute(&chosen)
        .with_context(|| format!("resolving {}", chosen.display()))?;
    let project = std::path::absolute(project_dir)
        .with_context(|| format!("resolving {}", project_dir.display()))?;
    if chosen.starts_with(&project) {
        anyhow::bail!(
            "download directory {} cannot reside in the project directory {}",
            chosen.display(),
            project.display()
        );
    }
    Ok(chosen)
}
