//! Engine association tags (`uev:<name>`).

use crate::error::{FetchError, Result};

/// Required engine association prefix.
pub const ENGINE_ASSOCIATION_PREFIX: &str = "uev:";

/// A validated engine association. `name` is the unprefixed build name and
/// doubles as the per-version directory name under the download root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    raw: String,
    name: String,
}

impl VersionTag {
    /// Validates `raw` before any I/O happens.
    ///
    /// The name must be non-empty and a single path component, since it is
    /// joined onto the download root.
    pub fn parse(raw: &str) -> Result<Self> {
        let name = raw
            .strip_prefix(ENGINE_ASSOCIATION_PREFIX)
            .ok_or_else(|| FetchError::InvalidVersionFormat(raw.to_string()))?;
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
        {
            return Err(FetchError::InvalidVersionFormat(raw.to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
            name: name.to_string(),
        })
    }

    /// Full tag including the prefix, e.g. `uev:5.3.0`.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Build name without the prefix, e.g. `5.3.0`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for VersionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
