// src/watch/path_utils.rs

//! Path handling for notify events.

use std::path::{Path, PathBuf};

/// Convert an event path into a root-relative string with forward slashes.
///
/// Tries a plain `strip_prefix` first. Event paths may carry a different
/// absolute prefix for the same directory (symlinks, `/private/var` on
/// macOS), so on failure both sides are canonicalized. A removed file can no
/// longer be canonicalized; its parent directory is used instead.
///
/// Returns `None` if the path lies outside `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_slash(rel));
    }

    let root_canon = root.canonicalize().ok()?;
    let path_canon = canonicalize_lenient(path)?;
    path_canon.strip_prefix(&root_canon).ok().map(to_slash)
}

fn canonicalize_lenient(path: &Path) -> Option<PathBuf> {
    if let Ok(canon) = path.canonicalize() {
        return Some(canon);
    }
    let parent = path.parent()?.canonicalize().ok()?;
    Some(parent.join(path.file_name()?))
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
