//! Configuration for slnfgen.
//!
//! Settings come from an optional `.slnfgen.yaml`, found by walking up from
//! the entry project's directory. Command-line flags override the file, and
//! the file overrides the built-in defaults.
//!
//! ```yaml
//! default-entry: dirs.proj
//! solution-extension: sln
//! traversal-marker: .proj
//! launcher:
//!   program: devenv
//!   args: []
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::relative::normalize_lexically;

/// Entry project used when none is given.
pub const DEFAULT_ENTRY: &str = "dirs.proj";

/// Extension of solution files.
pub const DEFAULT_SOLUTION_EXTENSION: &str = "sln";

/// Substring marking traversal projects.
pub const DEFAULT_TRAVERSAL_MARKER: &str = ".proj";

/// IDE executable used when none is configured.
pub const DEFAULT_LAUNCHER: &str = "devenv";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = ".slnfgen.yaml";

/// Maximum directory depth to traverse when searching for the config file
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Contents of `.slnfgen.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Entry project used when none is given on the command line.
    pub default_entry: Option<String>,

    /// Solution file extension, without the dot.
    pub solution_extension: Option<String>,

    /// Substring marking traversal projects.
    pub traversal_marker: Option<String>,

    /// IDE launcher settings.
    #[serde(default)]
    pub launcher: LauncherConfig,
}

/// Launcher section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherConfig {
    /// IDE executable name or path.
    pub program: Option<String>,

    /// Arguments placed before the manifest path.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file can't be read and [`Error::Config`]
    /// if it isn't valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| match e {
            Error::Config(message) => Error::Config(format!("{}: {message}", path.display())),
            other => other,
        })
    }

    /// Parse configuration from YAML text.
    ///
    /// An empty document is the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed YAML, unknown keys, or an empty
    /// solution extension.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if config
            .solution_extension
            .as_deref()
            .is_some_and(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(Error::Config("solution-extension must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Load the nearest `.slnfgen.yaml` at or above `start_dir`.
    ///
    /// Returns the default configuration if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is found but cannot be loaded.
    pub fn discover(start_dir: &Path) -> Result<Self> {
        match find_config_file(start_dir) {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Entry project name, falling back to [`DEFAULT_ENTRY`].
    #[must_use]
    pub fn default_entry(&self) -> &str {
        self.default_entry.as_deref().unwrap_or(DEFAULT_ENTRY)
    }

    /// Solution extension without a leading dot.
    #[must_use]
    pub fn solution_extension(&self) -> &str {
        self.solution_extension
            .as_deref()
            .map_or(DEFAULT_SOLUTION_EXTENSION, |ext| ext.trim_start_matches('.'))
    }

    /// Traversal marker, falling back to [`DEFAULT_TRAVERSAL_MARKER`].
    #[must_use]
    pub fn traversal_marker(&self) -> &str {
        self.traversal_marker
            .as_deref()
            .unwrap_or(DEFAULT_TRAVERSAL_MARKER)
    }
}

/// Find `.slnfgen.yaml` by walking up from `start_dir`.
#[must_use]
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    // A relative start would stop popping at the current directory.
    let mut current = std::path::absolute(start_dir)
        .map_or_else(|_| start_dir.to_path_buf(), |p| normalize_lexically(&p));
    let mut depth = 0;

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
