//! Solution file discovery.
//!
//! Finds the solution a solution filter should point at: either the one the
//! user named, or the nearest one found by walking up from a start directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::relative::normalize_lexically;
use crate::types::{Ambiguity, SolutionDescriptor, SolutionLocation};

/// Select the solution for a run.
///
/// If `explicit` is given it is made absolute (against the current directory)
/// and used as-is, without checking that it exists. Otherwise the search walks
/// up from `start_directory`:
///
/// - one `*.{extension}` file in a directory: that file wins
/// - several: the one with the shortest file name wins (ties go to the
///   ordinally smaller name) and the choice is reported as an [`Ambiguity`]
/// - none: continue with the parent directory
///
/// Directories that can't be listed are skipped with a warning.
///
/// # Errors
///
/// Returns [`Error::SolutionNotFound`] naming `start_directory` when the search
/// reaches the file system root without a match, or [`Error::Io`] if an
/// explicit path or the start directory cannot be made absolute.
pub fn locate(
    start_directory: &Path,
    explicit: Option<&Path>,
    extension: &str,
) -> Result<SolutionLocation> {
    if let Some(explicit) = explicit {
        let path = normalize_lexically(&std::path::absolute(explicit)?);
        debug!(solution = %path.display(), "Using explicit solution");
        return Ok(SolutionLocation {
            descriptor: SolutionDescriptor::new(path),
            ambiguity: None,
        });
    }

    let mut current = normalize_lexically(&std::path::absolute(start_directory)?);

    loop {
        let mut candidates = solutions_in(&current, extension);

        match candidates.len() {
            0 => {}
            1 => {
                let only = candidates.swap_remove(0);
                debug!(solution = %only.display(), "Found solution");
                return Ok(SolutionLocation {
                    descriptor: SolutionDescriptor::new(only),
                    ambiguity: None,
                });
            }
            _ => {
                let chosen = shortest_name(&candidates);
                debug!(
                    directory = %current.display(),
                    count = candidates.len(),
                    chosen = %chosen.display(),
                    "More than one solution found, using the shortest name"
                );
                return Ok(SolutionLocation {
                    descriptor: SolutionDescriptor::new(chosen.clone()),
                    ambiguity: Some(Ambiguity {
                        directory: current,
                        candidates,
                        chosen,
                    }),
                });
            }
        }

        if !current.pop() {
            return Err(Error::solution_not_found(extension, start_directory));
        }
    }
}

/// List files in `directory` with the given extension, sorted by file name.
fn solutions_in(directory: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                directory = %directory.display(),
                error = %e,
                "Cannot list directory, continuing with parent"
            );
            return Vec::new();
        }
    };

    let mut solutions: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_extension(path, extension))
        .collect();
    solutions.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    solutions
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Pick the candidate with the shortest file name.
///
/// `candidates` must be non-empty and sorted; the first minimum wins.
fn shortest_name(candidates: &[PathBuf]) -> PathBuf {
    candidates
        .iter()
        .min_by_key(|path| path.file_name().map_or(0, |name| name.len()))
        .cloned()
        .unwrap_or_default()
}
