// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::BuildConfig;
use crate::fs::FileSystem;
use crate::pipeline::sources::{glob_base, normalize_pattern, relative_slash_path, walk_files};

/// Compiled watch/exclude patterns.
///
/// Patterns are relative to the project root; `matches` takes root-relative
/// paths with forward slashes, e.g. `"static/stylesheets/partials/_a.scss"`.
#[derive(Clone)]
pub struct WatchProfile {
    patterns: Vec<String>,
    watch_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl WatchProfile {
    pub fn new(watch: &[String], exclude: &[String]) -> Result<Self> {
        let watch_set = build_globset(watch).context("building watch globset")?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };

        Ok(Self {
            patterns: watch.iter().map(|p| normalize_pattern(p).to_string()).collect(),
            watch_set,
            exclude_set,
        })
    }

    pub fn from_config(cfg: &BuildConfig) -> Result<Self> {
        Self::new(&cfg.watch, &cfg.exclude)
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.watch_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }

    /// Directories (relative to the root) that must be watched recursively
    /// to see every path the patterns can match. Nested bases are dropped.
    pub fn base_dirs(&self) -> Vec<PathBuf> {
        let mut bases: Vec<PathBuf> = self.patterns.iter().map(|p| glob_base(p)).collect();
        bases.sort();
        bases.dedup();

        let mut roots: Vec<PathBuf> = Vec::new();
        for base in bases {
            if !roots.iter().any(|r| base.starts_with(r)) {
                roots.push(base);
            }
        }
        roots
    }
}

/// Build a GlobSet from simple string patterns. Here `*` may cross `/`,
/// which only widens the broad watch set.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let pat = normalize_pattern(pat);
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Collect all files under `root` that match the profile.
///
/// Used for `use_hash = true` when computing the aggregate content hash.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    profile: &WatchProfile,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for base in profile.base_dirs() {
        let dir = root.join(base);
        if !fs.is_dir(&dir) {
            continue;
        }
        for path in walk_files(fs, &dir)? {
            if let Some(rel) = relative_slash_path(root, &path) {
                if profile.matches(&rel) {
                    files.push(path);
                }
            }
        }
    }

    files.sort();
    Ok(files)
}
