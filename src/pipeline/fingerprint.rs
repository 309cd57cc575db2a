// src/pipeline/fingerprint.rs

use std::path::{Path, PathBuf};

use crate::pipeline::{FileRecord, Stage, StageError};

/// Hex characters of the content hash kept in file names.
pub const TOKEN_LEN: usize = 10;

/// Content-derived token: the first [`TOKEN_LEN`] hex chars of the blake3
/// hash of `bytes`.
pub fn content_token(bytes: &[u8]) -> String {
    let hex = blake3::hash(bytes).to_hex();
    hex[..TOKEN_LEN].to_string()
}

/// `styles/app.css` + `0123456789` -> `styles/app-0123456789.css`.
pub fn fingerprinted_path(relative: &Path, token: &str) -> PathBuf {
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match relative.extension() {
        Some(ext) => format!("{stem}-{token}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{token}"),
    };
    relative.with_file_name(name)
}

/// Renames each record by content hash and remembers the original name for
/// the manifest.
#[derive(Debug, Default)]
pub struct Fingerprint;

impl Stage for Fingerprint {
    fn name(&self) -> &'static str {
        "fingerprint"
    }

    fn apply(&self, mut record: FileRecord) -> Result<FileRecord, StageError> {
        let token = content_token(record.contents.as_bytes());
        let renamed = fingerprinted_path(&record.relative, &token);
        record.revision_of = Some(std::mem::replace(&mut record.relative, renamed));
        Ok(record)
    }
}
