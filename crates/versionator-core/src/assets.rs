//! Which bundles to fetch for a version, and how to tell they are installed.
//!
//! Pure functions of [`DownloadOptions`]; no I/O happens here.

use std::path::{Path, PathBuf};

/// What to download for a version. Passed by value into the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Primary bundle name (e.g. `engine`, `editor`).
    pub bundle_name: String,
    /// Also fetch the `<bundle>-symbols` debug symbol bundle.
    pub fetch_symbols: bool,
    /// Extract an existing local archive without asking the server about it.
    pub assume_valid: bool,
    /// Use UE5 binary naming (`UnrealGame`/`UnrealEditor`) for sentinels.
    pub target_major_version_compat: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            bundle_name: "engine".to_string(),
            fetch_symbols: false,
            assume_valid: false,
            target_major_version_compat: false,
        }
    }
}

/// One bundle of a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSpec {
    /// Bundle name as it appears in the archive URL.
    pub name: String,
    pub enabled: bool,
    /// Relative path whose presence under `destination_dir` marks the asset as installed.
    pub verification_path: PathBuf,
    /// The per-version directory the bundle extracts into.
    pub destination_dir: PathBuf,
}

impl AssetSpec {
    /// Absolute sentinel path.
    pub fn sentinel(&self) -> PathBuf {
        self.destination_dir.join(&self.verification_path)
    }

    /// True when the sentinel already exists. Presence only; size and content are not checked.
    pub fn is_installed(&self) -> bool {
        self.sentinel().exists()
    }
}

const BINARIES_DIR: &str = "Engine/Binaries/Win64";

/// Sentinel file stem (without extension) for a bundle.
///
/// Bundles whose name contains `engine` ship the game binary; anything else
/// is treated as an editor bundle.
pub fn verification_stem(bundle: &str, ue5: bool) -> String {
    let binary = match (bundle.contains("engine"), ue5) {
        (true, true) => "UnrealGame",
        (true, false) => "UE4Game",
        (false, true) => "UnrealEditor",
        (false, false) => "UE4Editor",
    };
    format!("{}/{}.", BINARIES_DIR, binary)
}

/// Ordered asset list for `options`: the primary bundle, then its symbols.
///
/// Symbol bundles always carry the editor PDB, whatever the primary bundle is.
pub fn plan_assets(options: &DownloadOptions, destination: &Path) -> Vec<AssetSpec> {
    let ue5 = options.target_major_version_compat;
    vec![
        AssetSpec {
            name: options.bundle_name.clone(),
            enabled: true,
            verification_path: PathBuf::from(verification_stem(&options.bundle_name, ue5) + "exe"),
            destination_dir: destination.to_path_buf(),
        },
        AssetSpec {
            name: format!("{}-symbols", options.bundle_name),
            enabled: options.fetch_symbols,
            verification_path: PathBuf::from(verification_stem("editor", ue5) + "pdb"),
            destination_dir: destination.to_path_buf(),
        },
    ]
}
