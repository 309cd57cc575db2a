use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::{debug, info};

use crate::fs::FileSystem;
use crate::watch::cache::FileCache;
use crate::watch::patterns::{collect_matching_files, WatchProfile};

/// Compute the hash of a single file.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Compute aggregate hash from a list of `(path, file hash)` pairs.
///
/// Paths take part in the hash, so renaming a file counts as a change.
/// `entries` must be sorted by path to ensure stability.
pub fn compute_aggregate_hash(entries: &[(PathBuf, String)]) -> String {
    let mut hasher = Hasher::new();
    for (path, hash) in entries {
        hasher.update(path.to_string_lossy().as_bytes());
        hasher.update(&[0]);
        hasher.update(hash.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Suppresses change events that leave the watched content untouched
/// (editor saves without edits, `touch`, metadata-only events).
///
/// Keeps the last aggregate hash in memory; a fresh gate is primed from the
/// current disk state when the watcher starts.
#[derive(Debug)]
pub struct ContentGate {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    profile: WatchProfile,
    cache: FileCache,
    last: Option<String>,
}

impl ContentGate {
    pub fn new(fs: Arc<dyn FileSystem>, root: PathBuf, profile: WatchProfile) -> Self {
        Self {
            fs,
            root,
            profile,
            cache: FileCache::new(),
            last: None,
        }
    }

    /// Record the current content hash as the baseline.
    pub fn prime(&mut self) -> Result<()> {
        self.last = Some(self.current_hash()?);
        Ok(())
    }

    fn current_hash(&mut self) -> Result<String> {
        let files = collect_matching_files(self.fs.as_ref(), &self.root, &self.profile)?;
        self.cache.retain_only(&files);
        let mut entries = Vec::with_capacity(files.len());
        for path in files {
            let hash = self.cache.get_or_compute(self.fs.as_ref(), &path)?;
            entries.push((path, hash));
        }
        Ok(compute_aggregate_hash(&entries))
    }

    /// True if the watched content differs from the last observed state.
    /// `changed` paths have their cached hashes dropped first.
    pub fn has_changed(&mut self, changed: &[PathBuf]) -> Result<bool> {
        for path in changed {
            self.cache.invalidate(path);
        }

        let new_hash = self.current_hash()?;
        if self.last.as_deref() == Some(new_hash.as_str()) {
            info!("watched content unchanged; skipping compile");
            return Ok(false);
        }

        debug!(hash = %new_hash, "watched content changed");
        self.last = Some(new_hash);
        Ok(true)
    }
}
