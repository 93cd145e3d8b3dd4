//! # slnfgen: Solution filters from MSBuild traversal projects
//!
//! Large repositories often have one huge solution and many traversal
//! projects (`dirs.proj`) describing slices of the build. `slnfgen` turns a
//! traversal project into a Visual Studio solution filter (`.slnf`) that opens
//! the big solution with only that slice loaded.
//!
//! A run has four steps:
//!
//! 1. **Locate** the solution: explicit, or the nearest one above the entry
//! 2. **Load** the project graph reachable from the entry ([`GraphLoader`])
//! 3. **Build** the manifest: drop traversal nodes, relativize, deduplicate
//! 4. **Write** `<entry>.slnf` next to the entry project
//!
//! ## Quick Start
//!
//! ```no_run
//! use slnfgen::{FilterBuilder, MsBuildGraphLoader, SlnfGen};
//! use std::path::Path;
//!
//! let generator = SlnfGen::new(MsBuildGraphLoader::default(), FilterBuilder::default(), "sln");
//! let generation = generator.generate(Path::new("src/dirs.proj"), None)?;
//!
//! println!("Wrote {}", generation.manifest_path.display());
//! for missing in generation.report.missing() {
//!     println!("missing: {missing}");
//! }
//! # Ok::<(), slnfgen::Error>(())
//! ```

mod config;
mod error;
mod filter;
mod graph;
mod launcher;
mod locator;
mod manifest;
mod relative;
mod types;

pub use config::{
    CONFIG_FILE_NAME, Config, DEFAULT_ENTRY, DEFAULT_LAUNCHER, DEFAULT_SOLUTION_EXTENSION,
    DEFAULT_TRAVERSAL_MARKER, LauncherConfig, find_config_file,
};
pub use error::{Error, Result};
pub use filter::{FilterBuilder, check_existence};
pub use graph::{GraphLoader, MsBuildGraphLoader, project_references};
pub use launcher::{IdeLauncher, ProcessLauncher};
pub use locator::locate;
pub use manifest::{MANIFEST_EXTENSION, manifest_path_for, write_manifest};
pub use relative::{ends_with_slash, ensure_trailing_slash, is_slash, normalize_lexically, relativize};
pub use types::{
    Ambiguity, ExistenceReport, FileCheck, FilterManifest, ManifestSolution, NodeKind,
    ProjectNode, SolutionDescriptor, SolutionLocation, is_traversal_path,
};

use std::path::{Path, PathBuf};

use tracing::debug;

/// Everything produced by one [`SlnfGen::generate`] run.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Where the manifest was written.
    pub manifest_path: PathBuf,
    /// The manifest that was written.
    pub manifest: FilterManifest,
    /// The solution that was selected, and how.
    pub location: SolutionLocation,
    /// Which manifest entries exist on disk.
    pub report: ExistenceReport,
}

/// Solution filter generator.
///
/// Generic over the graph loader so the filter logic can run against a fake
/// graph in tests.
#[derive(Debug, Clone)]
pub struct SlnfGen<L> {
    loader: L,
    builder: FilterBuilder,
    solution_extension: String,
}

impl SlnfGen<MsBuildGraphLoader> {
    /// Create a generator from configuration, using [`MsBuildGraphLoader`].
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            MsBuildGraphLoader::new(config.traversal_marker()),
            FilterBuilder::new(config.traversal_marker()),
            config.solution_extension(),
        )
    }
}

impl<L: GraphLoader> SlnfGen<L> {
    /// Create a generator.
    #[must_use]
    pub fn new(loader: L, builder: FilterBuilder, solution_extension: impl Into<String>) -> Self {
        Self {
            loader,
            builder,
            solution_extension: solution_extension.into(),
        }
    }

    /// Generate and write the solution filter for `entry`.
    ///
    /// The solution search starts in the entry's directory unless
    /// `explicit_solution` is given. The manifest is written to
    /// [`manifest_path_for`] the entry, even if some referenced files are
    /// missing; check [`Generation::report`] for those.
    ///
    /// # Errors
    ///
    /// Returns an error if no solution is found, the graph cannot be loaded,
    /// or the manifest cannot be written.
    pub fn generate(&self, entry: &Path, explicit_solution: Option<&Path>) -> Result<Generation> {
        let entry = normalize_lexically(&std::path::absolute(entry)?);
        let manifest_path = manifest_path_for(&entry);
        let manifest_directory = manifest_path
            .parent()
            .map_or_else(PathBuf::new, Path::to_path_buf);

        let location = locate(&manifest_directory, explicit_solution, &self.solution_extension)?;
        let nodes = self.loader.load_graph(&entry)?;

        let manifest = self
            .builder
            .build(&nodes, &location.descriptor, &manifest_directory);
        let report = check_existence(&manifest, &location.descriptor, &manifest_directory);

        write_manifest(&manifest_path, &manifest)?;

        debug!(
            entry = %entry.display(),
            manifest = %manifest_path.display(),
            missing = report.missing().len(),
            "Generated solution filter"
        );

        Ok(Generation {
            manifest_path,
            manifest,
            location,
            report,
        })
    }
}
