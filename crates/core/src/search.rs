//! Upward search for a virtual environment marker directory
//!
//! Starting at a directory, each ancestor (inclusive) is probed for a
//! fixed-name subdirectory such as `.venv`. The closest match wins.

use crate::{Error, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

/// Marker directory name used when none is configured
pub const DEFAULT_MARKER: &str = ".venv";

/// A discovered virtual environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentMarker {
    /// Directory that contains the marker subdirectory
    pub root: PathBuf,
    /// The marker subdirectory itself (the environment directory)
    pub path: PathBuf,
}

/// Finds the nearest ancestor directory containing a marker subdirectory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorSearch {
    marker: String,
}

impl Default for AncestorSearch {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

impl AncestorSearch {
    /// Create a search for the given marker name.
    ///
    /// The marker must be a single, normal path component.
    pub fn new(marker: impl Into<String>) -> Result<Self> {
        let marker = marker.into();
        validate_marker(&marker)?;
        Ok(Self { marker })
    }

    /// The marker directory name
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Walk from `start` up to the filesystem root.
    ///
    /// `start` is made absolute and its `.` and `..` components are resolved
    /// first, so only real ancestors of the directory are probed.
    /// Returns `Ok(None)` when no directory on the way contains the marker.
    /// Any probe error other than "not found" aborts the walk.
    pub fn find(&self, start: &Path) -> Result<Option<EnvironmentMarker>> {
        let start = normalize_path(start)?;

        for dir in start.ancestors() {
            let candidate = dir.join(&self.marker);
            trace!(candidate = %candidate.display(), "Probing for environment marker");

            match std::fs::metadata(&candidate) {
                Ok(meta) if meta.is_dir() => {
                    debug!(
                        root = %dir.display(),
                        environment = %candidate.display(),
                        "Found environment marker"
                    );
                    return Ok(Some(EnvironmentMarker {
                        root: dir.to_path_buf(),
                        path: candidate,
                    }));
                }
                Ok(_) => {
                    trace!(candidate = %candidate.display(), "Marker exists but is not a directory");
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(Error::probe(candidate, e)),
            }
        }

        debug!(start = %start.display(), marker = %self.marker, "No environment marker found");
        Ok(None)
    }
}

/// Absolute form of `path` with `.` and `..` resolved lexically.
///
/// Symlinks are kept, matching the logical `$PWD` the shell reports.
fn normalize_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .map_err(|e| Error::io(e, Some(path.to_path_buf()), "resolve search start"))?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

fn validate_marker(marker: &str) -> Result<()> {
    let mut components = Path::new(marker).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::configuration_with_help(
            format!("Invalid environment marker '{marker}'"),
            "The marker must be a single directory name such as '.venv'",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_not_found_without_marker() {
        let temp_dir = TempDir::new().unwrap();
        let search = AncestorSearch::new("uv-autoenv-test-marker-absent").unwrap();
        assert_eq!(search.find(temp_dir.path()).unwrap(), None);
    }

    #[test]
    fn test_marker_in_start_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join(".venv")).unwrap();

        let found = AncestorSearch::default()
            .find(temp_dir.path())
            .unwrap()
            .unwrap();
        assert_eq!(found.root, temp_dir.path());
        assert_eq!(found.path, temp_dir.path().join(".venv"));
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let temp_dir = TempDir::new().unwrap();
        let outer = temp_dir.path();
        let inner = outer.join("a");
        let deep = inner.join("b").join("c");
        fs::create_dir_all(&deep).unwrap();
        fs::create_dir(outer.join(".venv")).unwrap();
        fs::create_dir(inner.join(".venv")).unwrap();

        let found = AncestorSearch::default().find(&deep).unwrap().unwrap();
        assert_eq!(found.root, inner);
    }

    #[test]
    fn test_marker_file_is_not_a_match() {
        let temp_dir = TempDir::new().unwrap();
        let marker = "uv-autoenv-test-file-marker";
        fs::write(temp_dir.path().join(marker), "not a directory").unwrap();

        let search = AncestorSearch::new(marker).unwrap();
        assert_eq!(search.find(temp_dir.path()).unwrap(), None);
    }

    #[test]
    fn test_search_from_root_terminates() {
        let search = AncestorSearch::new("uv-autoenv-test-marker-absent").unwrap();
        assert_eq!(search.find(Path::new("/")).unwrap(), None);
    }

    #[test]
    fn test_invalid_markers_rejected() {
        for marker in ["", "a/b", "..", "/abs", "."] {
            let err = AncestorSearch::new(marker).unwrap_err();
            assert!(
                err.to_string().contains("Invalid environment marker"),
                "marker {marker:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_parent_components_are_resolved_before_walking() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("proj").join(".venv")).unwrap();
        fs::create_dir_all(root.join("other")).unwrap();

        let start = root.join("proj").join("..").join("other");
        assert_eq!(AncestorSearch::default().find(&start).unwrap(), None);

        let start = root.join("other").join("..").join("proj").join(".");
        let found = AncestorSearch::default().find(&start).unwrap().unwrap();
        assert_eq!(found.root, root.join("proj"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/a/b/../c/./d")).unwrap(),
            PathBuf::from("/a/c/d")
        );
        assert_eq!(
            normalize_path(Path::new("/../..")).unwrap(),
            PathBuf::from("/")
        );
    }

    #[test]
    fn test_relative_start_resolves_against_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            normalize_path(Path::new("sub/../x")).unwrap(),
            cwd.join("x")
        );
    }
}
