//! Core data types shared by the locator, graph loader, and filter builder.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Whether a graph node is a real project or an orchestration-only file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A project that can be opened in the IDE (`.csproj`, `.vcxproj`, ...).
    Buildable,
    /// A traversal/aggregation file (`dirs.proj`, file copy projects, ...).
    Traversal,
}

/// A single node of the loaded project graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectNode {
    /// Absolute path of the project file.
    pub path: PathBuf,
    /// Classification of the node.
    pub kind: NodeKind,
}

impl ProjectNode {
    /// Create a node with an explicit classification.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: NodeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Create a node, classifying it as traversal when `marker` occurs in its path.
    ///
    /// Anything whose path contains `.proj` is almost never loadable in the IDE
    /// (traversal files, file copy projects), so that is the usual marker.
    #[must_use]
    pub fn classify(path: impl Into<PathBuf>, marker: &str) -> Self {
        let path = path.into();
        let kind = if is_traversal_path(&path, marker) {
            NodeKind::Traversal
        } else {
            NodeKind::Buildable
        };
        Self { path, kind }
    }

    /// Returns `true` if this node is orchestration-only.
    #[must_use]
    pub fn is_traversal(&self) -> bool {
        self.kind == NodeKind::Traversal
    }
}

/// Returns `true` if `path` contains the traversal `marker` substring.
///
/// An empty marker never matches.
#[must_use]
pub fn is_traversal_path(path: &Path, marker: &str) -> bool {
    !marker.is_empty() && path.to_string_lossy().contains(marker)
}

/// The solution file selected for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionDescriptor {
    path: PathBuf,
    directory: PathBuf,
}

impl SolutionDescriptor {
    /// Create a descriptor from an absolute solution file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let directory = path
            .parent()
            .map_or_else(|| path.clone(), Path::to_path_buf);
        Self { path, directory }
    }

    /// Absolute path of the solution file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the solution file.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Several solution files were found in one directory and one was picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    /// Directory holding the candidates.
    pub directory: PathBuf,
    /// Every candidate found, in the order they were considered.
    pub candidates: Vec<PathBuf>,
    /// The candidate that was selected.
    pub chosen: PathBuf,
}

/// Result of solution lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionLocation {
    /// The selected solution.
    pub descriptor: SolutionDescriptor,
    /// Set when the selection was made by the shortest-name heuristic.
    pub ambiguity: Option<Ambiguity>,
}

/// The solution filter document (`.slnf`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterManifest {
    /// The parent solution and the projects to load from it.
    pub solution: ManifestSolution,
}

/// The `solution` object of a solution filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSolution {
    /// Solution path relative to the directory holding the manifest.
    pub path: String,
    /// Project paths relative to the solution's directory.
    pub projects: Vec<String>,
}

/// Existence check for a single manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    /// Path exactly as written in the manifest.
    pub path: String,
    /// Whether the file exists relative to its base directory.
    pub exists: bool,
}

/// Existence check for every entry of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceReport {
    /// The solution entry, checked against the manifest directory.
    pub solution: FileCheck,
    /// Project entries, checked against the solution directory.
    pub projects: Vec<FileCheck>,
}

impl ExistenceReport {
    /// Entries (solution included) that don't exist on disk.
    #[must_use]
    pub fn missing(&self) -> Vec<&str> {
        std::iter::once(&self.solution)
            .chain(&self.projects)
            .filter(|check| !check.exists)
            .map(|check| check.path.as_str())
            .collect()
    }
}
