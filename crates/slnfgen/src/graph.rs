//! Project graph loading.
//!
//! The filter builder only needs the set of project files reachable from an
//! entry project and whether each one is a traversal file. [`GraphLoader`] is
//! that narrow interface; [`MsBuildGraphLoader`] implements it by scanning
//! MSBuild project XML for `ProjectReference` and `ProjectFile` items.
//!
//! The scanner is deliberately shallow. It does not evaluate conditions,
//! imports, or targets, and only understands the two directory properties that
//! traversal projects use to anchor their items:
//!
//! - `$(MSBuildThisFileDirectory)` (with trailing separator)
//! - `$(MSBuildProjectDirectory)` (without)
//!
//! Items using any other property, or wildcards, are skipped with a warning.

use std::collections::{HashSet, VecDeque};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::DEFAULT_TRAVERSAL_MARKER;
use crate::error::{Error, Result};
use crate::relative::normalize_lexically;
use crate::types::ProjectNode;

/// Loads the project graph rooted at an entry project.
pub trait GraphLoader {
    /// Return every project reachable from `entry`, the entry included.
    ///
    /// Node paths are absolute. Each path appears once.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry project cannot be loaded.
    fn load_graph(&self, entry: &Path) -> Result<Vec<ProjectNode>>;
}

static XML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

static PROJECT_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<\s*(?:ProjectReference|ProjectFile)\b(?:[^>"']|"[^"]*"|'[^']*')*?\bInclude\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
    )
    .expect("item pattern is valid")
});

static XML_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z]+);").expect("reference pattern is valid")
});

static PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\(\s*([A-Za-z_][\w.-]*)\s*\)").expect("property pattern is valid"));

/// Reads MSBuild project files directly from disk.
#[derive(Debug, Clone)]
pub struct MsBuildGraphLoader {
    traversal_marker: String,
}

impl Default for MsBuildGraphLoader {
    fn default() -> Self {
        Self::new(DEFAULT_TRAVERSAL_MARKER)
    }
}

impl MsBuildGraphLoader {
    /// Create a loader classifying paths containing `traversal_marker` as traversal.
    #[must_use]
    pub fn new(traversal_marker: impl Into<String>) -> Self {
        Self {
            traversal_marker: traversal_marker.into(),
        }
    }
}

impl GraphLoader for MsBuildGraphLoader {
    /// Walk project references breadth-first from `entry`.
    ///
    /// Referenced projects that are missing or unreadable are still returned
    /// as nodes, but their own references are not followed.
    fn load_graph(&self, entry: &Path) -> Result<Vec<ProjectNode>> {
        let entry = normalize_lexically(&std::path::absolute(entry)?);
        if !entry.is_file() {
            return Err(Error::EntryNotFound { path: entry });
        }

        let mut visited: HashSet<PathBuf> = HashSet::from([entry.clone()]);
        let mut nodes = vec![ProjectNode::classify(entry.clone(), &self.traversal_marker)];
        let mut queue = VecDeque::from([entry.clone()]);

        while let Some(project) = queue.pop_front() {
            let contents = match std::fs::read_to_string(&project) {
                Ok(contents) => contents,
                Err(e) if project == entry => return Err(Error::graph_load(project, e)),
                Err(e) => {
                    debug!(
                        project = %project.display(),
                        error = %e,
                        "Cannot read referenced project, not following its references"
                    );
                    continue;
                }
            };

            for reference in project_references(&project, &contents) {
                if visited.insert(reference.clone()) {
                    nodes.push(ProjectNode::classify(reference.clone(), &self.traversal_marker));
                    queue.push_back(reference);
                }
            }
        }

        debug!(
            entry = %entry.display(),
            node_count = nodes.len(),
            "Loaded project graph"
        );

        Ok(nodes)
    }
}

/// Extract the absolute paths of projects referenced by `project`.
///
/// `contents` is the XML text of `project`; relative includes resolve against
/// its directory.
#[must_use]
pub fn project_references(project: &Path, contents: &str) -> Vec<PathBuf> {
    let directory = project.parent().unwrap_or(Path::new(""));
    let without_comments = XML_COMMENT.replace_all(contents, "");

    PROJECT_ITEM
        .captures_iter(&without_comments)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .flat_map(|include| {
            unescape_xml(include.as_str())
                .split(';')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter_map(|item| resolve_item(project, directory, &item))
        .collect()
}

fn resolve_item(project: &Path, directory: &Path, item: &str) -> Option<PathBuf> {
    let Some(expanded) = expand_properties(item, directory) else {
        warn!(
            project = %project.display(),
            item,
            "Item uses an unsupported property, skipping"
        );
        return None;
    };

    if expanded.contains(['*', '?']) {
        warn!(
            project = %project.display(),
            item,
            "Wildcard items are not supported, skipping"
        );
        return None;
    }

    let native = if MAIN_SEPARATOR == '/' {
        expanded.replace('\\', "/")
    } else {
        expanded
    };

    Some(normalize_lexically(&directory.join(native)))
}

/// Substitute the directory properties MSBuild defines for every project.
///
/// Returns `None` if `item` references any other property.
fn expand_properties(item: &str, directory: &Path) -> Option<String> {
    let mut unsupported = false;
    let expanded = PROPERTY.replace_all(item, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        if name.eq_ignore_ascii_case("MSBuildThisFileDirectory") {
            format!("{}{MAIN_SEPARATOR}", directory.display())
        } else if name.eq_ignore_ascii_case("MSBuildProjectDirectory") {
            directory.display().to_string()
        } else {
            unsupported = true;
            String::new()
        }
    });

    (!unsupported).then(|| expanded.into_owned())
}

/// Decode the predefined XML entities and numeric character references.
///
/// Unknown or malformed references are kept as written.
fn unescape_xml(value: &str) -> String {
    XML_REFERENCE
        .replace_all(value, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            let decoded = match name {
                "quot" => Some('"'),
                "apos" => Some('\''),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                _ => numeric_reference(name),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// `#59` or `#x3B` to the character it names.
fn numeric_reference(name: &str) -> Option<char> {
    let number = name.strip_prefix('#')?;
    let code = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => number.parse().ok()?,
    };
    char::from_u32(code)
}
