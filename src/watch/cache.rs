// src/watch/cache.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::trace;

use crate::fs::FileSystem;
use crate::watch::hash::compute_file_hash;

/// Per-file content hashes remembered between change events.
///
/// A watch event names the files it touched; only those are forgotten and
/// re-read; all other stylesheets keep their hash from the previous event.
#[derive(Debug, Default)]
pub struct FileCache {
    hashes: BTreeMap<PathBuf, String>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash of `path`, reading the file only on a miss.
    pub fn get_or_compute(&mut self, fs: &dyn FileSystem, path: &Path) -> Result<String> {
        match self.hashes.get(path) {
            Some(hash) => Ok(hash.clone()),
            None => {
                trace!(path = ?path, "hashing stylesheet");
                let hash = compute_file_hash(fs, path)?;
                self.hashes.insert(path.to_path_buf(), hash.clone());
                Ok(hash)
            }
        }
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.hashes.remove(path);
    }

    /// Drop entries for files that are no longer watched (deleted or
    /// renamed away).
    pub fn retain_only(&mut self, live: &[PathBuf]) {
        self.hashes.retain(|path, _| live.binary_search(path).is_ok());
    }
}
