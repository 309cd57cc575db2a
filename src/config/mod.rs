// src/config/mod.rs

//! Configuration loading and validation for stylewatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate globs and the task graph (`validate.rs`).
//! - Resolve everything into the immutable [`BuildConfig`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_explicit_or_default, load_from_path};
pub use model::{
    BuildConfig, ConfigFile, PathsSection, PipelineOverrides, PipelineSection,
    RawConfigFile, TaskConfig, WatchSection,
};
