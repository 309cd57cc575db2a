// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::{OutputStyle, PipelineFlags, TriggerWhileRunningBehaviour, Variant};

pub const DEFAULT_MANIFEST_NAME: &str = "rev_manifest.json";

/// Raw configuration file before validation.
///
/// Every section is optional; an empty file reproduces the original
/// stylesheet layout:
///
/// ```toml
/// [paths]
/// build = ["static/stylesheets/*.scss"]
/// watch = ["static/stylesheets/**/*.scss"]
/// bundle_dir = "static/bundles"
///
/// [pipeline]
/// variant = "a"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub pipeline: PipelineSection,

    #[serde(default)]
    pub watch: WatchSection,

    /// User-declared composite tasks from `[task.<name>]`.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// Validated configuration.
///
/// Can only be constructed via `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so holding one means task references resolve and the task graph is
/// acyclic.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    paths: PathsSection,
    pipeline: PipelineSection,
    watch: WatchSection,
    task: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            paths: raw.paths,
            pipeline: raw.pipeline,
            watch: raw.watch,
            task: raw.task,
        }
    }

    pub fn paths(&self) -> &PathsSection {
        &self.paths
    }

    pub fn pipeline(&self) -> &PipelineSection {
        &self.pipeline
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    pub fn tasks(&self) -> &BTreeMap<String, TaskConfig> {
        &self.task
    }
}

/// `[paths]` section. All paths are relative to the project root.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Narrow set: files compiled by `compile`. `*` does not cross `/`.
    #[serde(default = "default_build")]
    pub build: Vec<String>,

    /// Broad set: files whose changes re-trigger `compile`.
    #[serde(default = "default_watch")]
    pub watch: Vec<String>,

    /// Paths the watcher ignores even if they match `watch`.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default = "default_bundle_dir")]
    pub bundle_dir: String,

    /// Directory receiving the fingerprint manifest.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,
}

fn default_build() -> Vec<String> {
    vec!["static/stylesheets/*.scss".to_string()]
}

fn default_watch() -> Vec<String> {
    vec!["static/stylesheets/**/*.scss".to_string()]
}

fn default_bundle_dir() -> String {
    "static/bundles".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_manifest_name() -> String {
    DEFAULT_MANIFEST_NAME.to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            build: default_build(),
            watch: default_watch(),
            exclude: Vec::new(),
            bundle_dir: default_bundle_dir(),
            data_dir: default_data_dir(),
            manifest_name: default_manifest_name(),
        }
    }
}

/// `[pipeline]` section.
///
/// `variant` picks a preset; the individual flags override it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineSection {
    #[serde(default)]
    pub variant: Option<Variant>,

    #[serde(default)]
    pub bulk_import: Option<bool>,

    #[serde(default)]
    pub fingerprint: Option<bool>,

    #[serde(default)]
    pub source_maps: Option<bool>,

    #[serde(default)]
    pub output_style: OutputStyle,

    /// Extra directories searched by `@import`, relative to the project root.
    #[serde(default)]
    pub load_paths: Vec<String>,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchSection {
    #[serde(default)]
    pub triggered_while_running_behaviour: TriggerWhileRunningBehaviour,

    /// Only recompile when the aggregated content of watched files changed.
    #[serde(default)]
    pub use_hash: bool,
}

/// `[task.<name>]` section: a composite task with ordered prerequisites.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskConfig {
    /// Prerequisites, run sequentially in this order.
    #[serde(default)]
    pub after: Vec<String>,

    /// Shown next to the task in `--dry-run` output.
    #[serde(default)]
    pub description: Option<String>,
}

/// Pipeline settings requested on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOverrides {
    pub variant: Option<Variant>,
    pub bulk_import: Option<bool>,
    pub fingerprint: Option<bool>,
    pub source_maps: Option<bool>,
}

impl PipelineSection {
    /// Resolve the effective stage flags.
    ///
    /// Precedence, highest first: CLI flag, CLI variant, config flag, config
    /// variant, variant A.
    pub fn resolve_flags(&self, overrides: &PipelineOverrides) -> PipelineFlags {
        let (base, file_flags_apply) = match overrides.variant {
            Some(v) => (v.flags(), false),
            None => (self.variant.unwrap_or_default().flags(), true),
        };

        let pick = |cli: Option<bool>, file: Option<bool>, preset: bool| {
            cli.or(if file_flags_apply { file } else { None })
                .unwrap_or(preset)
        };

        PipelineFlags {
            bulk_import: pick(overrides.bulk_import, self.bulk_import, base.bulk_import),
            fingerprint: pick(overrides.fingerprint, self.fingerprint, base.fingerprint),
            source_maps: pick(overrides.source_maps, self.source_maps, base.source_maps),
        }
    }
}

/// Immutable, fully resolved settings handed to the orchestrator.
///
/// Built once at startup from a validated [`ConfigFile`], the project root
/// and CLI overrides. Directories are already joined onto `root`; glob
/// patterns stay root-relative.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub root: PathBuf,
    pub build: Vec<String>,
    pub watch: Vec<String>,
    pub exclude: Vec<String>,
    pub bundle_dir: PathBuf,
    pub data_dir: PathBuf,
    pub manifest_name: String,
    pub flags: PipelineFlags,
    pub output_style: OutputStyle,
    pub load_paths: Vec<PathBuf>,
    pub behaviour: TriggerWhileRunningBehaviour,
    pub use_hash: bool,
}

impl BuildConfig {
    pub fn resolve(
        cfg: &ConfigFile,
        root: impl AsRef<Path>,
        overrides: &PipelineOverrides,
    ) -> Self {
        let root = root.as_ref().to_path_buf();
        let paths = cfg.paths();
        let pipeline = cfg.pipeline();

        Self {
            build: paths.build.clone(),
            watch: paths.watch.clone(),
            exclude: paths.exclude.clone(),
            bundle_dir: root.join(&paths.bundle_dir),
            data_dir: root.join(&paths.data_dir),
            manifest_name: paths.manifest_name.clone(),
            flags: pipeline.resolve_flags(overrides),
            output_style: pipeline.output_style,
            load_paths: pipeline.load_paths.iter().map(|p| root.join(p)).collect(),
            behaviour: cfg.watch().triggered_while_running_behaviour,
            use_hash: cfg.watch().use_hash,
            root,
        }
    }

    /// Where the fingerprint manifest is written.
    pub fn manifest_path(&self) -> PathBuf {
        self.data_dir.join(&self.manifest_name)
    }
}
