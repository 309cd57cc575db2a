// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, bail, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    /// Writes below any of these prefixes fail (simulates a read-only dir).
    read_only: Vec<PathBuf>,
}

/// In-memory filesystem for tests.
///
/// Cloning shares the underlying state, so a test can keep a handle while
/// the pipeline writes through another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.add_dir(".");
        fs
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert or replace a file; parent directories appear implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        if let Some(parent) = path.parent() {
            insert_dir_chain(&mut state.dirs, parent);
        }
        state.files.insert(path, content.into());
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        insert_dir_chain(&mut state.dirs, path.as_ref());
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) -> bool {
        self.lock().files.remove(path.as_ref()).is_some()
    }

    /// Make every write at or below `prefix` fail.
    pub fn set_read_only(&self, prefix: impl AsRef<Path>) {
        self.lock().read_only.push(prefix.as_ref().to_path_buf());
    }

    /// Contents of a file as UTF-8, if it exists.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.lock()
            .files
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Names of the files directly inside `dir`, sorted.
    pub fn file_names_in(&self, dir: impl AsRef<Path>) -> Vec<String> {
        let dir = dir.as_ref();
        self.lock()
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect()
    }
}

fn insert_dir_chain(dirs: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = Some(path);
    while let Some(dir) = current {
        if dir.as_os_str().is_empty() {
            break;
        }
        if !dirs.insert(dir.to_path_buf()) {
            break;
        }
        current = dir.parent();
    }
}

impl FileSystem for MockFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let state = self.lock();
        match state.files.get(path) {
            Some(content) => Ok(content.clone()),
            None if state.dirs.contains(path) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| anyhow!("Invalid UTF-8 in {:?}: {}", path, e))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.read(path)?)))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        {
            let state = self.lock();
            if state.read_only.iter().any(|prefix| path.starts_with(prefix)) {
                bail!("Permission denied: {:?}", path);
            }
        }
        self.add_file(path, contents);
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.lock().files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().dirs.contains(path)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // Tests use absolute paths throughout, so they are already canonical.
        Ok(path.to_path_buf())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.lock();
        if !state.dirs.contains(path) {
            bail!("Not a directory or not found: {:?}", path);
        }

        let is_child = |p: &&PathBuf| p.parent() == Some(path);
        let mut entries: Vec<PathBuf> = state.dirs.iter().filter(is_child).cloned().collect();
        entries.extend(state.files.keys().filter(is_child).cloned());
        Ok(entries)
    }
}
