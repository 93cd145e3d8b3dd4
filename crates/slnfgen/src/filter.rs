//! Solution filter construction.
//!
//! Turns a loaded project graph into a [`FilterManifest`]. Two base
//! directories are involved and must not be mixed up:
//!
//! - the solution path is relative to the directory the manifest is written to
//! - project paths are relative to the solution's own directory
//!
//! Visual Studio resolves them that way, even though a solution filter usually
//! sits next to the traversal project rather than next to the solution.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::config::DEFAULT_TRAVERSAL_MARKER;
use crate::relative::relativize;
use crate::types::{
    ExistenceReport, FileCheck, FilterManifest, ManifestSolution, ProjectNode, SolutionDescriptor,
    is_traversal_path,
};

/// Builds solution filters from project graphs.
#[derive(Debug, Clone)]
pub struct FilterBuilder {
    traversal_marker: String,
}

impl Default for FilterBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TRAVERSAL_MARKER)
    }
}

impl FilterBuilder {
    /// Create a builder that drops nodes whose path contains `traversal_marker`.
    #[must_use]
    pub fn new(traversal_marker: impl Into<String>) -> Self {
        Self {
            traversal_marker: traversal_marker.into(),
        }
    }

    /// The marker substring identifying traversal projects.
    #[must_use]
    pub fn traversal_marker(&self) -> &str {
        &self.traversal_marker
    }

    /// Returns `true` if the node should be left out of the filter.
    ///
    /// A node is excluded when the loader classified it as traversal or when
    /// its path contains the marker.
    #[must_use]
    pub fn excludes(&self, node: &ProjectNode) -> bool {
        node.is_traversal() || is_traversal_path(&node.path, &self.traversal_marker)
    }

    /// Build the manifest for `nodes`.
    ///
    /// Traversal nodes are dropped, the rest are made relative to the solution
    /// directory and deduplicated keeping first-seen order.
    #[must_use]
    pub fn build(
        &self,
        nodes: &[ProjectNode],
        solution: &SolutionDescriptor,
        manifest_directory: &Path,
    ) -> FilterManifest {
        let solution_path = relativize(manifest_directory, solution.path());

        let mut seen = HashSet::new();
        let mut projects = Vec::new();
        let mut excluded = 0usize;

        for node in nodes {
            if self.excludes(node) {
                excluded += 1;
                continue;
            }
            let relative = relativize(solution.directory(), &node.path);
            if seen.insert(relative.clone()) {
                projects.push(relative);
            }
        }

        debug!(
            nodes = nodes.len(),
            excluded,
            projects = projects.len(),
            "Built solution filter"
        );

        FilterManifest {
            solution: ManifestSolution {
                path: solution_path,
                projects,
            },
        }
    }
}

/// Check that every entry of `manifest` exists on disk.
///
/// The solution entry is resolved against `manifest_directory` and project
/// entries against the solution's directory, matching how the manifest is
/// read. Missing files are reported, never treated as errors.
#[must_use]
pub fn check_existence(
    manifest: &FilterManifest,
    solution: &SolutionDescriptor,
    manifest_directory: &Path,
) -> ExistenceReport {
    let check = |base: &Path, entry: &str| {
        let exists = base.join(entry).is_file();
        if !exists {
            debug!(base = %base.display(), path = entry, "Referenced file doesn't exist");
        }
        FileCheck {
            path: entry.to_string(),
            exists,
        }
    };

    ExistenceReport {
        solution: check(manifest_directory, &manifest.solution.path),
        projects: manifest
            .solution
            .projects
            .iter()
            .map(|project| check(solution.directory(), project))
            .collect(),
    }
}
