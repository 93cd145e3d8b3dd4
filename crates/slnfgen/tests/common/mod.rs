//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Create a temporary tree with the given files.
pub fn tree_with_files(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("should create temp dir");
    write_files(dir.path(), files);
    dir
}

/// Write files (creating parent directories) under `root`.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("should create parent dirs");
        }
        fs::write(&full_path, content).expect("should write file");
    }
}

/// A traversal project referencing `includes`.
pub fn traversal_project(includes: &[&str]) -> String {
    let items: String = includes
        .iter()
        .map(|include| format!("    <ProjectReference Include=\"{include}\" />\n"))
        .collect();
    format!(
        "<Project Sdk=\"Microsoft.Build.Traversal\">\n  <ItemGroup>\n{items}  </ItemGroup>\n</Project>\n"
    )
}

/// A minimal SDK-style C# project referencing `includes`.
pub fn csharp_project(includes: &[&str]) -> String {
    let items: String = includes
        .iter()
        .map(|include| format!("    <ProjectReference Include=\"{include}\" />\n"))
        .collect();
    format!("<Project Sdk=\"Microsoft.NET.Sdk\">\n  <ItemGroup>\n{items}  </ItemGroup>\n</Project>\n")
}

/// Canonical form of a temp dir path (macOS `/var` is a symlink to `/private/var`).
pub fn root(dir: &TempDir) -> PathBuf {
    dir.path().canonicalize().expect("should canonicalize temp dir")
}

/// Run the slnfgen binary in `dir`.
pub fn run_slnfgen_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_slnfgen"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute slnfgen binary")
}
