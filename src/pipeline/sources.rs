// src/pipeline/sources.rs

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use crate::fs::FileSystem;

/// A stylesheet selected by the build glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Location on disk.
    pub path: PathBuf,
    /// Path relative to the glob base; outputs keep this layout.
    pub relative: PathBuf,
}

const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}'];

/// Strip a leading `./` so `./static/*.scss` and `static/*.scss` agree.
pub fn normalize_pattern(pattern: &str) -> &str {
    let mut p = pattern;
    while let Some(rest) = p.strip_prefix("./") {
        p = rest;
    }
    p
}

/// Leading directory components of `pattern` that contain no glob
/// metacharacters, e.g. `static/stylesheets` for
/// `static/stylesheets/**/*.scss`.
pub fn glob_base(pattern: &str) -> PathBuf {
    let pattern = normalize_pattern(pattern);
    let mut base = PathBuf::new();
    let mut components = Path::new(pattern).components().peekable();

    while let Some(component) = components.next() {
        // The last component is the file part even without metacharacters.
        if components.peek().is_none() {
            break;
        }
        let text = component.as_os_str().to_string_lossy();
        if text.contains(GLOB_META) {
            break;
        }
        if !matches!(component, Component::CurDir) {
            base.push(component);
        }
    }

    base
}

/// Compile a pattern so that `*` and `?` never cross a `/`; only `**` is
/// recursive.
pub fn path_matcher(pattern: &str) -> Result<GlobMatcher> {
    let pattern = normalize_pattern(pattern);
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

/// Sass partials (`_name.scss`) are only compiled through an import.
pub fn is_partial(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('_'))
        .unwrap_or(false)
}

/// Slash-separated `path` relative to `root`.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}

/// Every file under `dir`, depth first. Errors if `dir` cannot be read.
pub fn walk_files(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// Collect the non-partial files under `root` matching any of `patterns`,
/// sorted by path and without duplicates.
///
/// A missing base directory is an error.
pub fn collect_sources(
    fs: &dyn FileSystem,
    root: &Path,
    patterns: &[String],
) -> Result<Vec<SourceFile>> {
    let mut found: BTreeMap<PathBuf, SourceFile> = BTreeMap::new();

    for pattern in patterns {
        let matcher = path_matcher(pattern)?;
        let base = root.join(glob_base(pattern));

        let files = walk_files(fs, &base)
            .with_context(|| format!("collecting sources for pattern {pattern}"))?;

        for path in files {
            let Some(rel) = relative_slash_path(root, &path) else {
                continue;
            };
            if !matcher.is_match(&rel) || is_partial(&path) {
                continue;
            }
            let relative = path
                .strip_prefix(&base)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(path.file_name().unwrap_or_default()));
            found
                .entry(path.clone())
                .or_insert(SourceFile { path, relative });
        }
    }

    let sources: Vec<SourceFile> = found.into_values().collect();
    debug!(count = sources.len(), "collected build sources");
    Ok(sources)
}
