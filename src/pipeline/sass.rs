// src/pipeline/sass.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use grass::InputSyntax;
use tracing::debug;

use crate::fs::{FileSystem, SassFs};
use crate::pipeline::{FileRecord, Stage, StageError};
use crate::types::OutputStyle;

/// Compiles Sass/SCSS to CSS with `grass`.
///
/// Imports resolve against the source file's directory first, then the
/// configured load paths. Syntax errors become [`StageError::Compile`].
#[derive(Debug)]
pub struct SassCompile {
    fs: Arc<dyn FileSystem>,
    style: OutputStyle,
    load_paths: Vec<PathBuf>,
}

impl SassCompile {
    pub fn new(fs: Arc<dyn FileSystem>, style: OutputStyle, load_paths: Vec<PathBuf>) -> Self {
        Self {
            fs,
            style,
            load_paths,
        }
    }
}

fn syntax_for(path: &Path) -> InputSyntax {
    match path.extension().and_then(|e| e.to_str()) {
        Some("sass") => InputSyntax::Sass,
        Some("css") => InputSyntax::Css,
        _ => InputSyntax::Scss,
    }
}

impl Stage for SassCompile {
    fn name(&self) -> &'static str {
        "sass"
    }

    fn apply(&self, mut record: FileRecord) -> Result<FileRecord, StageError> {
        let sass_fs = SassFs(self.fs.as_ref());
        let dir = record.source_dir();

        let mut options = grass::Options::default()
            .fs(&sass_fs)
            .style(self.style.into())
            .input_syntax(syntax_for(&record.source))
            .load_path(&dir);
        for path in &self.load_paths {
            options = options.load_path(path);
        }

        let css = grass::from_string(record.contents.clone(), &options).map_err(|err| {
            StageError::Compile {
                file: record.source.clone(),
                message: err.to_string(),
            }
        })?;

        debug!(file = ?record.source, bytes = css.len(), "compiled stylesheet");

        record.contents = css;
        record.relative.set_extension("css");
        Ok(record)
    }
}
