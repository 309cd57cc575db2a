// src/pipeline/source_map.rs

//! Inline source maps.
//!
//! `grass` does not report span information, so maps are file-level: every
//! generated line points at the start of the entry stylesheet. Browsers
//! still show the original file and its full contents.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::pipeline::{FileRecord, Stage, StageError};

const DATA_URL_PREFIX: &str = "data:application/json;charset=utf8;base64,";

/// Version 3 source map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u8,
    pub file: String,
    pub sources: Vec<String>,
    pub sources_content: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    /// Map each line of `css` to line 0, column 0 of `source`.
    pub fn file_level(file: &str, source: &str, source_content: &str, css: &str) -> Self {
        // "AAAA": generated column 0, source 0, line 0, column 0. Later lines
        // repeat it because fields are relative except the generated column.
        let lines = css.lines().count().max(1);
        let mappings = vec!["AAAA"; lines].join(";");

        Self {
            version: 3,
            file: file.to_string(),
            sources: vec![source.to_string()],
            sources_content: vec![source_content.to_string()],
            names: Vec::new(),
            mappings,
        }
    }

    /// `/*# sourceMappingURL=data:... */` comment embedding this map.
    pub fn inline_comment(&self) -> serde_json::Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(format!(
            "/*# sourceMappingURL={DATA_URL_PREFIX}{} */",
            STANDARD.encode(json)
        ))
    }

    /// Recover an inline map from compiled CSS, if present.
    pub fn extract_inline(css: &str) -> Option<Self> {
        let start = css.rfind(DATA_URL_PREFIX)? + DATA_URL_PREFIX.len();
        let end = start + css[start..].find(" */")?;
        let bytes = STANDARD.decode(&css[start..end]).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Appends an inline source map to each compiled record.
#[derive(Debug, Default)]
pub struct SourceMaps;

impl Stage for SourceMaps {
    fn name(&self) -> &'static str {
        "source-maps"
    }

    fn apply(&self, mut record: FileRecord) -> Result<FileRecord, StageError> {
        let file = record.relative_name();
        let source = record
            .source_relative
            .to_string_lossy()
            .replace('\\', "/");
        let map = SourceMap::file_level(&file, &source, &record.original, &record.contents);

        let comment = map
            .inline_comment()
            .map_err(|e| StageError::Fatal(e.into()))?;

        let mut contents = record.contents.trim_end().to_string();
        contents.push_str("\n\n");
        contents.push_str(&comment);
        contents.push('\n');

        record.contents = contents;
        record.source_map = Some(map);
        Ok(record)
    }
}
