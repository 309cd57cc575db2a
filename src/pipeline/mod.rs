// src/pipeline/mod.rs

//! The `compile` task.
//!
//! Sources matching the build glob are loaded into [`FileRecord`]s and pushed
//! through an ordered list of [`Stage`]s:
//!
//! 1. bulk-import expansion (optional)
//! 2. Sass compilation
//! 3. inline source maps (optional)
//! 4. content fingerprinting (optional)
//!
//! Each surviving record is written to the bundle directory. With
//! fingerprinting on, the revision manifest is rebuilt from this run's
//! records and replaces the previous one.
//!
//! A stylesheet that fails to compile is logged and skipped; every other
//! error aborts the run.

pub mod bulk_import;
pub mod fingerprint;
pub mod manifest;
pub mod sass;
pub mod source_map;
pub mod sources;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::BuildConfig;
use crate::errors::Result;
use crate::fs::FileSystem;

pub use manifest::Manifest;
pub use source_map::SourceMap;
pub use sources::{collect_sources, SourceFile};

/// A stylesheet in flight through the pipeline.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Source file on disk.
    pub source: PathBuf,
    /// Source path relative to the glob base (never renamed).
    pub source_relative: PathBuf,
    /// Current output path relative to the bundle directory.
    pub relative: PathBuf,
    /// Source contents as read from disk.
    pub original: String,
    /// Current contents.
    pub contents: String,
    pub source_map: Option<SourceMap>,
    /// Output path before fingerprinting, set by the fingerprint stage.
    pub revision_of: Option<PathBuf>,
}

impl FileRecord {
    pub fn new(source: SourceFile, contents: String) -> Self {
        Self {
            source: source.path,
            source_relative: source.relative.clone(),
            relative: source.relative,
            original: contents.clone(),
            contents,
            source_map: None,
            revision_of: None,
        }
    }

    /// Read a source from disk.
    ///
    /// Bytes that are not UTF-8, or a file that vanished after collection
    /// (an editor's atomic save), only cost this file. Other read errors
    /// are fatal.
    pub fn load(
        fs: &dyn FileSystem,
        source: SourceFile,
    ) -> std::result::Result<Self, StageError> {
        let bytes = match fs.read(&source.path) {
            Ok(bytes) => bytes,
            Err(_) if !fs.is_file(&source.path) => {
                return Err(StageError::Compile {
                    file: source.path,
                    message: "source disappeared before it could be read".to_string(),
                });
            }
            Err(err) => return Err(StageError::Fatal(err)),
        };

        match String::from_utf8(bytes) {
            Ok(contents) => Ok(Self::new(source, contents)),
            Err(err) => Err(StageError::Compile {
                message: format!("source is not valid UTF-8: {}", err.utf8_error()),
                file: source.path,
            }),
        }
    }

    /// Directory of the source file; imports resolve against it.
    pub fn source_dir(&self) -> PathBuf {
        self.source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// File name of the current output path.
    pub fn relative_name(&self) -> String {
        self.relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Why a stage rejected a record.
#[derive(Debug, Error)]
pub enum StageError {
    /// The stylesheet itself is broken; skip it and carry on.
    #[error("failed to compile {file:?}: {message}")]
    Compile { file: PathBuf, message: String },

    /// Anything else; the run stops.
    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

/// One transform applied to every record, in order.
pub trait Stage: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;
    fn apply(&self, record: FileRecord) -> std::result::Result<FileRecord, StageError>;
}

/// Ordered stage list.
#[derive(Debug)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Stages enabled by the config's flags, in their fixed order.
    pub fn from_config(fs: Arc<dyn FileSystem>, cfg: &BuildConfig) -> Self {
        let mut stages: Vec<Box<dyn Stage>> = Vec::new();

        if cfg.flags.bulk_import {
            stages.push(Box::new(bulk_import::BulkImport::new(Arc::clone(&fs))));
        }
        stages.push(Box::new(sass::SassCompile::new(
            fs,
            cfg.output_style,
            cfg.load_paths.clone(),
        )));
        if cfg.flags.source_maps {
            stages.push(Box::new(source_map::SourceMaps));
        }
        if cfg.flags.fingerprint {
            stages.push(Box::new(fingerprint::Fingerprint));
        }

        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn process(&self, record: FileRecord) -> std::result::Result<FileRecord, StageError> {
        self.stages.iter().try_fold(record, |record, stage| {
            debug!(stage = stage.name(), file = ?record.source, "applying stage");
            stage.apply(record)
        })
    }
}

/// A stylesheet that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileFailure {
    pub file: PathBuf,
    pub message: String,
}

/// Summary of one `compile` run.
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    /// Artifacts written, as absolute paths inside the bundle directory.
    pub written: Vec<PathBuf>,
    pub failures: Vec<CompileFailure>,
    /// Set when fingerprinting wrote a manifest.
    pub manifest: Option<PathBuf>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run the `compile` task once.
pub fn run_compile(fs: &Arc<dyn FileSystem>, cfg: &BuildConfig) -> Result<CompileReport> {
    let started = Instant::now();
    let sources = collect_sources(fs.as_ref(), &cfg.root, &cfg.build)?;
    let pipeline = Pipeline::from_config(Arc::clone(fs), cfg);

    info!(
        sources = sources.len(),
        stages = ?pipeline.stage_names(),
        "compiling stylesheets"
    );

    let mut report = CompileReport::default();
    let mut compiled = Vec::with_capacity(sources.len());

    for source in sources {
        let processed = FileRecord::load(fs.as_ref(), source)
            .and_then(|record| pipeline.process(record));

        match processed {
            Ok(record) => {
                let dest = cfg.bundle_dir.join(&record.relative);
                fs.write(&dest, record.contents.as_bytes())?;
                debug!(dest = ?dest, "wrote stylesheet");
                report.written.push(dest);
                compiled.push(record);
            }
            Err(StageError::Compile { file, message }) => {
                error!(file = ?file, "{message}");
                report.failures.push(CompileFailure { file, message });
            }
            Err(StageError::Fatal(err)) => return Err(err.into()),
        }
    }

    if cfg.flags.fingerprint {
        let manifest = Manifest::from_records(&compiled);
        let path = cfg.manifest_path();
        manifest.write(fs.as_ref(), &path)?;
        report.manifest = Some(path);
    }

    info!(
        written = report.written.len(),
        failed = report.failures.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "compile finished"
    );

    Ok(report)
}
