//! Path relativization.
//!
//! Paths are converted to `file:` URLs and related to each other the way URI
//! relative references work: the shared prefix is dropped and the base's
//! remaining directories become `..` segments. The URL form is only an
//! intermediate representation; callers get plain paths back, percent-decoded
//! and using the host's primary separator.
//!
//! | Base | Target | Result |
//! |------|--------|--------|
//! | `/repo/src` | `/repo/src/app/App.csproj` | `app/App.csproj` |
//! | `/repo/src/` | `/repo/lib/Lib.csproj` | `../lib/Lib.csproj` |
//! | `/repo/src` | `/repo/src` | `` (empty) |
//! | `/repo/src` | `/repo/` | `../` |
//! | `/repo/src` | `app/App.csproj` | `app/App.csproj` |
//! | `` | `/repo/App.csproj` | `/repo/App.csproj` |

use std::path::{Component, MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

use percent_encoding::percent_decode_str;
use tracing::debug;
use url::Url;

/// Compute the path of `path` relative to the directory `base_path`.
///
/// `base_path` is always treated as a directory, whether or not it ends with a
/// separator. A relative `path` is interpreted as relative to `base_path` and
/// normalized against it first. A `path` equal to `base_path` yields the empty
/// string.
///
/// If `base_path` is empty, or no relative form exists (the base isn't
/// absolute, the target is on another drive or UNC host), `path` is returned
/// verbatim.
#[must_use]
pub fn relativize(base_path: &Path, path: &Path) -> String {
    let verbatim = || path.to_string_lossy().into_owned();

    if base_path.as_os_str().is_empty() {
        return verbatim();
    }

    let base = ensure_trailing_slash(&base_path.to_string_lossy());
    let base_dir = normalize_lexically(Path::new(&base));
    let Ok(base_url) = Url::from_directory_path(&base_dir) else {
        debug!(base = %base_path.display(), "Base is not an absolute directory, keeping path");
        return verbatim();
    };

    let target_is_dir = ends_with_slash(&path.to_string_lossy());
    let target = if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&base_dir.join(path))
    };

    if target == base_dir {
        return String::new();
    }

    let target_url = if target_is_dir {
        Url::from_directory_path(&target)
    } else {
        Url::from_file_path(&target)
    };
    let Ok(target_url) = target_url else {
        debug!(path = %path.display(), "Target has no file URL form, keeping path");
        return verbatim();
    };

    let Some(relative) = relative_reference(&base_url, &target_url) else {
        debug!(
            base = %base_path.display(),
            path = %path.display(),
            "No relative form between base and target, keeping path"
        );
        return verbatim();
    };

    percent_decode_str(&relative)
        .decode_utf8_lossy()
        .replace('/', MAIN_SEPARATOR_STR)
}

/// Relative reference from a directory URL to another URL, with `/` separators.
///
/// Returns `None` when the URLs don't share a host and volume.
fn relative_reference(base: &Url, target: &Url) -> Option<String> {
    if base.scheme() != target.scheme() || base.host() != target.host() {
        return None;
    }

    let base_segments: Vec<&str> = base.path_segments()?.collect();
    let target_segments: Vec<&str> = target.path_segments()?.collect();

    // A directory URL always ends with an empty segment.
    let (_, base_dirs) = base_segments.split_last()?;
    let (target_name, target_dirs) = target_segments.split_last()?;

    if !same_volume(base_dirs.first(), target_dirs.first()) {
        return None;
    }

    let common = base_dirs
        .iter()
        .zip(target_dirs)
        .take_while(|(a, b)| segment_eq(a, b))
        .count();

    let mut segments: Vec<&str> = std::iter::repeat_n("..", base_dirs.len() - common).collect();
    segments.extend(&target_dirs[common..]);
    // Empty when the target is a directory, which leaves a trailing separator.
    segments.push(target_name);

    Some(segments.join("/"))
}

fn same_volume(base_first: Option<&&str>, target_first: Option<&&str>) -> bool {
    let base_drive = base_first.filter(|s| is_drive_segment(s));
    let target_drive = target_first.filter(|s| is_drive_segment(s));
    match (base_drive, target_drive) {
        (None, None) => true,
        (Some(a), Some(b)) => segment_eq(a, b),
        _ => false,
    }
}

fn is_drive_segment(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    cfg!(windows) && bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn segment_eq(a: &str, b: &str) -> bool {
    if cfg!(windows) {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

/// Resolve `.` and `..` components without touching the file system.
///
/// `..` at the root stays at the root. Leading `..` components of a relative
/// path are kept.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Append the host separator to `path` unless it already ends with a slash.
#[must_use]
pub fn ensure_trailing_slash(path: &str) -> String {
    if ends_with_slash(path) {
        path.to_string()
    } else {
        format!("{path}{MAIN_SEPARATOR}")
    }
}

/// Returns `true` if `path` ends with either separator character.
#[must_use]
pub fn ends_with_slash(path: &str) -> bool {
    path.chars().last().is_some_and(is_slash)
}

/// Returns `true` for `/` and `\`.
#[must_use]
pub fn is_slash(c: char) -> bool {
    c == '/' || c == '\\'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn ensure_trailing_slash_appends_host_separator() {
        assert_eq!(
            ensure_trailing_slash("/repo/src"),
            format!("/repo/src{MAIN_SEPARATOR}")
        );
    }

    #[rstest]
    #[case::forward("/repo/src/")]
    #[case::backslash("C:\\repo\\")]
    fn ensure_trailing_slash_keeps_existing(#[case] input: &str) {
        assert_eq!(ensure_trailing_slash(input), input);
    }

    #[rstest]
    #[case::empty("", false)]
    #[case::forward("a/", true)]
    #[case::back("a\\", true)]
    #[case::none("a", false)]
    fn ends_with_slash_checks_both_separators(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(ends_with_slash(input), expected);
    }

    #[test]
    fn empty_base_returns_path_unchanged() {
        assert_eq!(
            relativize(Path::new(""), Path::new("/repo/App.csproj")),
            "/repo/App.csproj"
        );
    }

    #[test]
    fn relative_base_has_no_relative_form() {
        assert_eq!(
            relativize(Path::new("repo/src"), Path::new("/repo/src/App.csproj")),
            "/repo/src/App.csproj"
        );
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        #[rstest]
        #[case::child("/repo/src", "/repo/src/app/App.csproj", "app/App.csproj")]
        #[case::sibling("/repo/src", "/repo/lib/Lib.csproj", "../lib/Lib.csproj")]
        #[case::trailing_slash_base("/repo/src/", "/repo/lib/Lib.csproj", "../lib/Lib.csproj")]
        #[case::same_directory("/repo/src", "/repo/src/App.csproj", "App.csproj")]
        #[case::equal("/repo/src", "/repo/src", "")]
        #[case::equal_with_slash("/repo/src/", "/repo/src/", "")]
        #[case::ancestor_dir("/repo/src/app", "/repo/", "../../")]
        #[case::ancestor_as_file("/repo/src/app", "/repo", "../../../repo")]
        #[case::root_base("/", "/repo/All.sln", "repo/All.sln")]
        #[case::dot_segments("/repo/src/./app/..", "/repo/src/App.csproj", "App.csproj")]
        #[case::relative_target("/repo/src", "app/App.csproj", "app/App.csproj")]
        #[case::relative_parent_target("/repo/src", "../lib/Lib.csproj", "../lib/Lib.csproj")]
        #[case::spaces("/repo/my src", "/repo/my src/My App.csproj", "My App.csproj")]
        #[case::literal_percent("/repo", "/repo/A%20B/x.csproj", "A%20B/x.csproj")]
        #[case::hash("/repo", "/repo/C#/x.csproj", "C#/x.csproj")]
        fn relativize_unix_paths(#[case] base: &str, #[case] target: &str, #[case] expected: &str) {
            assert_eq!(relativize(Path::new(base), Path::new(target)), expected);
        }

        #[test]
        fn base_without_trailing_slash_is_a_directory() {
            let without = relativize(Path::new("/repo/src"), Path::new("/repo/src/a/A.csproj"));
            let with = relativize(Path::new("/repo/src/"), Path::new("/repo/src/a/A.csproj"));
            assert_eq!(without, with);
            assert_eq!(without, "a/A.csproj");
        }

        #[rstest]
        #[case::plain("/a/b/c", "/a/b/c")]
        #[case::cur_dir("/a/./b", "/a/b")]
        #[case::parent("/a/b/../c", "/a/c")]
        #[case::above_root("/../a", "/a")]
        #[case::relative_leading_parent("../a/../b", "../b")]
        fn normalize_lexically_resolves_dots(#[case] input: &str, #[case] expected: &str) {
            assert_eq!(normalize_lexically(Path::new(input)), PathBuf::from(expected));
        }
    }

    #[cfg(windows)]
    mod windows {
        use super::*;

        #[rstest]
        #[case::child("C:\\repo\\src", "C:\\repo\\src\\app\\App.csproj", "app\\App.csproj")]
        #[case::sibling("C:\\repo\\src", "C:\\repo\\lib\\Lib.csproj", "..\\lib\\Lib.csproj")]
        #[case::case_insensitive("C:\\Repo\\Src", "c:\\repo\\src\\App.csproj", "App.csproj")]
        #[case::forward_slashes("C:/repo/src", "C:/repo/src/a/A.csproj", "a\\A.csproj")]
        fn relativize_windows_paths(
            #[case] base: &str,
            #[case] target: &str,
            #[case] expected: &str,
        ) {
            assert_eq!(relativize(Path::new(base), Path::new(target)), expected);
        }

        #[test]
        fn different_drive_returns_target_verbatim() {
            assert_eq!(
                relativize(Path::new("C:\\repo"), Path::new("D:\\other\\App.csproj")),
                "D:\\other\\App.csproj"
            );
        }
    }
}
