//! Error types for slnfgen operations.
//!
//! Only a small set of conditions halt a run:
//!
//! - no solution file anywhere above the start directory
//! - the entry project cannot be read
//! - the manifest cannot be serialized or written
//! - the IDE launcher cannot be started
//!
//! Everything else (ambiguous solutions, missing referenced projects, paths
//! that cannot be relativized) is reported as data and logged, never thrown.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for slnfgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for slnfgen operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No solution file was found in the start directory or any ancestor.
    #[error("couldn't find a .{extension} above {}", start.display())]
    SolutionNotFound {
        /// Solution file extension that was searched for.
        extension: String,
        /// Directory the upward search started from.
        start: PathBuf,
    },

    /// The entry traversal project does not exist.
    #[error("entry project not found: {}", path.display())]
    EntryNotFound {
        /// Path that was given as the entry project.
        path: PathBuf,
    },

    /// A project file in the graph could not be read.
    #[error("failed to load project {}: {source}", path.display())]
    GraphLoad {
        /// Project file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest could not be serialized to JSON.
    #[error("failed to serialize solution filter: {0}")]
    Serialize(#[from] serde_json::Error),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// The IDE executable could not be found.
    #[error("{program} not found\n\nSet `launcher.program` in .slnfgen.yaml, pass --launcher, or use --no-launch.")]
    LauncherNotFound {
        /// The program that was looked up.
        program: String,
    },

    /// The IDE process failed to start.
    #[error("failed to launch '{program}': {source}")]
    Launch {
        /// The program that failed to spawn.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a solution-not-found error for a start directory.
    #[must_use]
    pub fn solution_not_found(extension: &str, start: impl Into<PathBuf>) -> Self {
        Self::SolutionNotFound {
            extension: extension.to_string(),
            start: start.into(),
        }
    }

    /// Create a graph load error for a project file.
    #[must_use]
    pub fn graph_load(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::GraphLoad {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error came from the solution locator.
    #[must_use]
    pub fn is_locator_error(&self) -> bool {
        matches!(self, Self::SolutionNotFound { .. })
    }
}
