// src/errors.rs

//! Error type shared by the library APIs.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StylewatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Cycle detected in task graph: {0}")]
    TaskCycle(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Cannot watch {path:?}: {reason}")]
    WatchRegistration { path: PathBuf, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StylewatchError>;
