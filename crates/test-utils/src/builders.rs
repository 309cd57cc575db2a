#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use stylewatch::config::{BuildConfig, ConfigFile, PipelineOverrides, RawConfigFile, TaskConfig};
use stylewatch::fs::mock::MockFileSystem;
use stylewatch::fs::FileSystem;
use stylewatch::types::{TriggerWhileRunningBehaviour, Variant};

/// Project root used by mock-filesystem tests.
pub const ROOT: &str = "/site";

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.config.pipeline.variant = Some(variant);
        self
    }

    pub fn bulk_import(mut self, on: bool) -> Self {
        self.config.pipeline.bulk_import = Some(on);
        self
    }

    pub fn fingerprint(mut self, on: bool) -> Self {
        self.config.pipeline.fingerprint = Some(on);
        self
    }

    pub fn source_maps(mut self, on: bool) -> Self {
        self.config.pipeline.source_maps = Some(on);
        self
    }

    pub fn build_pattern(mut self, pattern: &str) -> Self {
        self.config.paths.build = vec![pattern.to_string()];
        self
    }

    pub fn watch_pattern(mut self, pattern: &str) -> Self {
        self.config.paths.watch = vec![pattern.to_string()];
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.paths.exclude.push(pattern.to_string());
        self
    }

    pub fn behaviour(mut self, behaviour: TriggerWhileRunningBehaviour) -> Self {
        self.config.watch.triggered_while_running_behaviour = behaviour;
        self
    }

    pub fn use_hash(mut self, on: bool) -> Self {
        self.config.watch.use_hash = on;
        self
    }

    pub fn with_task(mut self, name: &str, after: &[&str]) -> Self {
        self.config.task.insert(
            name.to_string(),
            TaskConfig {
                after: after.iter().map(|s| s.to_string()).collect(),
                description: None,
            },
        );
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    /// Validate and resolve against `root` with no CLI overrides.
    pub fn resolve(self, root: impl AsRef<Path>) -> BuildConfig {
        BuildConfig::resolve(&self.build(), root, &PipelineOverrides::default())
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A mock project under [`ROOT`] with the default stylesheet layout.
#[derive(Clone)]
pub struct MockProject {
    pub fs: MockFileSystem,
}

impl MockProject {
    pub fn new() -> Self {
        let fs = MockFileSystem::new();
        fs.add_dir(Path::new(ROOT).join("static/stylesheets"));
        Self { fs }
    }

    pub fn root(&self) -> PathBuf {
        PathBuf::from(ROOT)
    }

    pub fn stylesheets(&self) -> PathBuf {
        self.root().join("static/stylesheets")
    }

    pub fn bundles(&self) -> PathBuf {
        self.root().join("static/bundles")
    }

    /// Add a file relative to `static/stylesheets`.
    pub fn stylesheet(&self, rel: &str, contents: &str) -> &Self {
        self.fs.add_file(self.stylesheets().join(rel), contents);
        self
    }

    pub fn bundle(&self, name: &str) -> Option<String> {
        self.fs.contents(self.bundles().join(name))
    }

    pub fn bundle_names(&self) -> Vec<String> {
        self.fs.file_names_in(self.bundles())
    }

    pub fn shared_fs(&self) -> Arc<dyn FileSystem> {
        Arc::new(self.fs.clone())
    }
}

impl Default for MockProject {
    fn default() -> Self {
        Self::new()
    }
}
