// src/logging.rs

//! Logging for `stylewatch`, built on `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. `--log-level` (applies to every target)
//! 2. `STYLEWATCH_LOG`, either a bare level (`debug`) or full directives
//!    (`stylewatch=debug,notify=warn`)
//! 3. `info`
//!
//! Everything goes to stderr, including Sass compile errors, so stdout only
//! carries `--dry-run` output.

use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "STYLEWATCH_LOG";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let default = cli_level.map(LevelFilter::from).unwrap_or(LevelFilter::INFO);
    let builder = EnvFilter::builder().with_default_directive(default.into());
    let filter = match cli_level {
        Some(_) => builder.parse_lossy(""),
        None => builder.with_env_var(LOG_ENV_VAR).from_env_lossy(),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}
