// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

pub const DEFAULT_CONFIG_FILE: &str = "Stylewatch.toml";

/// Parse a config file without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Parse a config file and check globs, task references and prerequisite
/// cycles. Missing keys take their serde defaults.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve which config to use.
///
/// - An explicit path must exist; a missing file is an error.
/// - Without one, `Stylewatch.toml` in the working directory is used if
///   present, otherwise the built-in defaults.
///
/// Returns the validated config and the path it came from (if any).
pub fn load_explicit_or_default(
    explicit: Option<&Path>,
) -> Result<(ConfigFile, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((load_and_validate(path)?, Some(path.to_path_buf())));
    }

    let fallback = default_config_path();
    if fallback.is_file() {
        return Ok((load_and_validate(&fallback)?, Some(fallback)));
    }

    debug!("no {DEFAULT_CONFIG_FILE} found; using built-in defaults");
    Ok((ConfigFile::try_from(RawConfigFile::default())?, None))
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
