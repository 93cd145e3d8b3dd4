//! Solution filter serialization and writing.
//!
//! Manifests are written with the temp-file-then-rename pattern so an
//! interrupted run never leaves a truncated `.slnf` behind for the IDE to
//! choke on. The temporary file sits next to the target (same file system).

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::types::FilterManifest;

/// Extension of solution filter files.
pub const MANIFEST_EXTENSION: &str = "slnf";

/// The manifest path for an entry project: same location, `.slnf` extension.
#[must_use]
pub fn manifest_path_for(entry: &Path) -> PathBuf {
    entry.with_extension(MANIFEST_EXTENSION)
}

impl FilterManifest {
    /// Serialize as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serialize`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a manifest from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serialize`] if `json` is not a solution filter.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Atomically write `manifest` to `path`.
///
/// # Errors
///
/// Returns an error if serialization fails, the temporary file cannot be
/// written, or the rename fails. On failure an existing file at `path` is left
/// unchanged.
pub fn write_manifest(path: &Path, manifest: &FilterManifest) -> Result<()> {
    let json = manifest.to_json_pretty()?;

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }

    std::fs::rename(&temp_path, path)?;

    debug!(
        path = %path.display(),
        projects = manifest.solution.projects.len(),
        "Wrote solution filter"
    );

    Ok(())
}
