//! Small path helpers shared by the pipeline stages.
//!
//! Stages absolutize their artifact paths at construction time and render
//! deck paths relative to the directory the external tool runs in.

use std::path::{Path, PathBuf};

/// Absolutizes a path against the current working directory without
/// touching the filesystem.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Computes `path` relative to `base`, inserting `..` components as
/// needed. Both paths are expected to be absolute; when they share no
/// common prefix, `path` is returned unchanged.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_components: Vec<_> = path.components().collect();
    let base_components: Vec<_> = base.components().collect();

    let mut common = 0;
    while common < path_components.len()
        && common < base_components.len()
        && path_components[common] == base_components[common]
    {
        common += 1;
    }
    if common == 0 {
        return path.to_path_buf();
    }

    let mut result = PathBuf::new();
    for _ in common..base_components.len() {
        result.push("..");
    }
    for component in &path_components[common..] {
        result.push(component);
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

/// Appends a suffix to the file name of a prefix path, e.g. turning a
/// grid prefix `out/grid` into `out/grid.nrg`.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_name().unwrap_or_default();
    path.with_file_name(format!("{}{}", stem.to_string_lossy(), suffix))
}

/// File stem as an owned string, empty when the path has none.
pub fn stem(path: &Path) -> String {
    path.file_stem().unwrap_or_default().to_string_lossy().into_owned()
}
