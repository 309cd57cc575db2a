// src/pipeline/bulk_import.rs

//! Wildcard `@import` expansion.
//!
//! ```scss
//! @import "components/*";
//! ```
//!
//! becomes one `@import` per matching stylesheet, relative to the importing
//! file and sorted:
//!
//! ```scss
//! @import "components/_buttons.scss";
//! @import "components/_forms.scss";
//! ```
//!
//! In a comma list (`@import "base", "components/*";`) each wildcard item is
//! expanded in place and plain items are kept, one `@import` per line.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use anyhow::Result;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::pipeline::sources::{glob_base, path_matcher, relative_slash_path, walk_files};
use crate::pipeline::{FileRecord, Stage, StageError};

/// A whole `@import` statement made of quoted items.
static IMPORT_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+((?:"[^"\n]*"|'[^'\n]*')(?:\s*,\s*(?:"[^"\n]*"|'[^'\n]*'))*)[ \t]*;?"#)
        .expect("static import statement regex")
});

static QUOTED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"\n]*)"|'([^'\n]*)'"#).expect("static import item regex")
});

const IMPORTABLE_EXTENSIONS: &[&str] = &["scss", "sass", "css"];

/// Expand every wildcard import in `source`, resolving patterns against
/// `dir` (the importing file's directory).
///
/// A pattern that matches nothing expands to nothing.
pub fn expand_bulk_imports(fs: &dyn FileSystem, dir: &Path, source: &str) -> Result<String> {
    let mut failure = None;

    let expanded = IMPORT_STATEMENT.replace_all(source, |caps: &Captures<'_>| {
        if !caps[1].contains('*') {
            return caps[0].to_string();
        }
        match expand_statement(fs, dir, &caps[1]) {
            Ok(imports) => imports,
            Err(err) => {
                failure.get_or_insert(err);
                String::new()
            }
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(expanded.into_owned()),
    }
}

fn expand_statement(fs: &dyn FileSystem, dir: &Path, items: &str) -> Result<String> {
    let mut lines = Vec::new();
    for item in QUOTED_ITEM.captures_iter(items) {
        let target = item.get(1).or_else(|| item.get(2)).map_or("", |m| m.as_str());
        if target.contains('*') {
            lines.extend(expand_pattern(fs, dir, target)?);
        } else {
            lines.push(format!("@import {};", &item[0]));
        }
    }
    Ok(lines.join("\n"))
}

fn expand_pattern(fs: &dyn FileSystem, dir: &Path, pattern: &str) -> Result<Vec<String>> {
    let matcher = path_matcher(pattern)?;
    let base = dir.join(glob_base(pattern));

    if !fs.is_dir(&base) {
        warn!(pattern, dir = ?dir, "bulk import base directory does not exist");
        return Ok(Vec::new());
    }

    let mut matches: Vec<String> = walk_files(fs, &base)?
        .into_iter()
        .filter(|p| {
            p.extension()
                .map(|ext| IMPORTABLE_EXTENSIONS.iter().any(|e| ext == *e))
                .unwrap_or(false)
        })
        .filter_map(|p| relative_slash_path(dir, &p))
        .filter(|rel| matcher.is_match(rel) || matcher.is_match(strip_extension(rel)))
        .collect();
    matches.sort();

    debug!(pattern, count = matches.len(), "expanded bulk import");

    Ok(matches
        .iter()
        .map(|rel| format!("@import \"{rel}\";"))
        .collect())
}

/// `dir/*` is commonly written without an extension.
fn strip_extension(rel: &str) -> &str {
    match rel.rfind('.') {
        Some(idx) if !rel[idx..].contains('/') => &rel[..idx],
        _ => rel,
    }
}

/// Stage wrapper around [`expand_bulk_imports`].
#[derive(Debug)]
pub struct BulkImport {
    fs: Arc<dyn FileSystem>,
}

impl BulkImport {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl Stage for BulkImport {
    fn name(&self) -> &'static str {
        "bulk-import"
    }

    fn apply(&self, mut record: FileRecord) -> Result<FileRecord, StageError> {
        let dir = record.source_dir();
        record.contents = expand_bulk_imports(self.fs.as_ref(), &dir, &record.contents)
            .map_err(StageError::Fatal)?;
        Ok(record)
    }
}
