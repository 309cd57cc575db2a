// src/pipeline/manifest.rs

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::pipeline::FileRecord;

/// Original output name -> fingerprinted name, both relative to the bundle
/// directory with forward slashes.
///
/// Serialised as a flat, key-sorted JSON object so unchanged builds produce
/// byte-identical files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    /// Collect entries from fingerprinted records; others are ignored.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FileRecord>) -> Self {
        let entries = records
            .into_iter()
            .filter_map(|r| {
                let original = r.revision_of.as_ref()?;
                Some((slash(original), slash(&r.relative)))
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace whatever manifest exists at `path`.
    pub fn write(&self, fs: &dyn FileSystem, path: &Path) -> Result<()> {
        fs.write(path, self.to_json()?.as_bytes())?;
        info!(path = ?path, entries = self.len(), "wrote revision manifest");
        Ok(())
    }
}

fn slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
