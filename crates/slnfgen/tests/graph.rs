//! Graph loading and end-to-end generation from project files on disk.

use std::fs;

use slnfgen::{
    Config, Error, FilterManifest, GraphLoader, MsBuildGraphLoader, NodeKind, SlnfGen,
};

mod common;
use common::{csharp_project, root, traversal_project, tree_with_files};

/// Solution one level above `src/`, a traversal project with three projects
/// and one nested traversal project.
fn sample_tree() -> tempfile::TempDir {
    tree_with_files(&[
        ("All.sln", ""),
        (
            "src/dirs.proj",
            &traversal_project(&["app\\App.csproj", "lib/Lib.csproj", "tools/dirs.proj"]),
        ),
        ("src/app/App.csproj", &csharp_project(&["..\\lib\\Lib.csproj"])),
        ("src/lib/Lib.csproj", &csharp_project(&[])),
        ("src/tools/dirs.proj", &traversal_project(&["Tool/Tool.csproj"])),
        ("src/tools/Tool/Tool.csproj", &csharp_project(&[])),
    ])
}

#[test]
fn loads_transitive_graph_once_per_project() {
    let dir = sample_tree();
    let root = root(&dir);

    let nodes = MsBuildGraphLoader::default()
        .load_graph(&root.join("src/dirs.proj"))
        .expect("load graph");

    let mut paths: Vec<_> = nodes.iter().map(|n| n.path.clone()).collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![
            root.join("src/app/App.csproj"),
            root.join("src/dirs.proj"),
            root.join("src/lib/Lib.csproj"),
            root.join("src/tools/Tool/Tool.csproj"),
            root.join("src/tools/dirs.proj"),
        ]
    );
    assert_eq!(
        nodes.iter().filter(|n| n.kind == NodeKind::Traversal).count(),
        2
    );
    assert_eq!(nodes[0].path, root.join("src/dirs.proj"), "entry comes first");
}

#[test]
fn follows_references_of_buildable_projects() {
    let dir = tree_with_files(&[
        ("dirs.proj", &traversal_project(&["a/A.csproj"])),
        ("a/A.csproj", &csharp_project(&["../b/B.csproj"])),
        ("b/B.csproj", &csharp_project(&[])),
    ]);
    let root = root(&dir);

    let nodes = MsBuildGraphLoader::default()
        .load_graph(&root.join("dirs.proj"))
        .expect("load graph");

    assert!(nodes.iter().any(|n| n.path == root.join("b/B.csproj")));
}

#[test]
fn reference_cycles_terminate() {
    let dir = tree_with_files(&[
        ("a/A.csproj", &csharp_project(&["../b/B.csproj"])),
        ("b/B.csproj", &csharp_project(&["../a/A.csproj"])),
    ]);
    let root = root(&dir);

    let nodes = MsBuildGraphLoader::default()
        .load_graph(&root.join("a/A.csproj"))
        .expect("load graph");

    assert_eq!(nodes.len(), 2);
}

#[test]
fn missing_references_are_kept_but_not_followed() {
    let dir = tree_with_files(&[("dirs.proj", &traversal_project(&["gone/Gone.csproj"]))]);
    let root = root(&dir);

    let nodes = MsBuildGraphLoader::default()
        .load_graph(&root.join("dirs.proj"))
        .expect("missing references aren't fatal");

    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[1].path, root.join("gone/Gone.csproj"));
}

#[test]
fn missing_entry_is_an_error() {
    let dir = tree_with_files(&[]);
    let root = root(&dir);

    let err = MsBuildGraphLoader::default()
        .load_graph(&root.join("dirs.proj"))
        .expect_err("entry must exist");

    assert!(matches!(err, Error::EntryNotFound { .. }));
}

#[test]
fn end_to_end_manifest_has_three_projects() {
    let dir = sample_tree();
    let root = root(&dir);
    let generator = SlnfGen::from_config(&Config::default());

    let generation = generator
        .generate(&root.join("src/dirs.proj"), None)
        .expect("generate");

    let written = fs::read_to_string(root.join("src/dirs.slnf")).expect("manifest written");
    let manifest = FilterManifest::from_json(&written).expect("manifest parses");
    assert_eq!(manifest, generation.manifest);

    assert_eq!(manifest.solution.path, "..".to_string() + std::path::MAIN_SEPARATOR_STR + "All.sln");
    assert_eq!(manifest.solution.projects.len(), 3);
    assert!(manifest.solution.projects.iter().all(|p| !p.contains(".proj")));
    assert!(generation.report.missing().is_empty());

    let mut projects = manifest.solution.projects.clone();
    projects.sort();
    let expected: Vec<String> = ["src/app/App.csproj", "src/lib/Lib.csproj", "src/tools/Tool/Tool.csproj"]
        .iter()
        .map(|p| p.replace('/', std::path::MAIN_SEPARATOR_STR))
        .collect();
    assert_eq!(projects, expected);
}

#[test]
fn configured_marker_changes_classification() {
    let dir = tree_with_files(&[
        ("All.sln", ""),
        ("src/dirs.proj", &traversal_project(&["copy/Copy.proj", "app/App.csproj"])),
        ("src/copy/Copy.proj", "<Project />"),
        ("src/app/App.csproj", &csharp_project(&[])),
    ]);
    let root = root(&dir);
    let config = Config::from_yaml("traversal-marker: dirs.proj\n").expect("parse config");

    let generation = SlnfGen::from_config(&config)
        .generate(&root.join("src/dirs.proj"), None)
        .expect("generate");

    assert_eq!(generation.manifest.solution.projects.len(), 2);
    assert!(
        generation
            .manifest
            .solution
            .projects
            .iter()
            .any(|p| p.ends_with("Copy.proj"))
    );
}
