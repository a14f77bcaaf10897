//! Installed build registry: engine association → build directory.
//!
//! Persisted as TOML under the XDG data dir so editor tooling can find a
//! build from a project's engine association.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Registered builds keyed by full engine association (e.g. `uev:5.3.0`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildRegistry {
    #[serde(default)]
    pub builds: BTreeMap<String, PathBuf>,
}

impl BuildRegistry {
    /// Default path: `~/.local/share/versionator/builds.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("versionator")?;
        Ok(xdg_dirs
            .get_data_home()
            .join("versionator")
            .join("builds.toml"))
    }

    /// Loads the registry; a missing file is an empty registry.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading build registry {}", path.display()))?;
        toml::from_str(&data).with_context(|| format!("parsing build registry {}", path.display()))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Records `association` → `dest`, replacing any earlier entry.
    pub fn register(&mut self, association: &str, dest: &Path) -> Option<PathBuf> {
        self.builds.insert(association.to_string(), dest.to_path_buf())
    }

    pub fn get(&self, association: &str) -> Option<&Path> {
        self.builds.get(association).map(PathBuf::as_path)
    }
}

/// Load, register and save in one step.
pub fn register_build(path: &Path, association: &str, dest: &Path) -> Result<()> {
    let mut registry = BuildRegistry::load_from_path(path)?;
    if let Some(previous) = registry.register(association, dest) {
        if previous != dest {
            tracing::info!("{} moved from {} to {}", association, previous.display(), dest.display());
        }
    }
    registry.save_to_path(path)?;
    tracing::info!("Registered {} at {}", association, dest.display());
    Ok(())
}
