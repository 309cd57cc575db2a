// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::model::PipelineOverrides;
use crate::types::Variant;

/// Command-line arguments for `stylewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stylewatch",
    version,
    about = "Compile Sass stylesheets into CSS bundles and recompile on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Task to run: `compile` (`sass`), `watch` (`sass:watch`), `default`,
    /// or any task declared under `[task.<name>]`.
    #[arg(value_name = "TASK", default_value = "default")]
    pub task: String,

    /// Path to the config file (TOML).
    ///
    /// When omitted, `Stylewatch.toml` in the current directory is used if it
    /// exists, otherwise built-in defaults apply.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Pipeline preset reproducing one of the historical build setups.
    #[arg(long, value_enum, value_name = "VARIANT")]
    pub variant: Option<Variant>,

    /// Expand wildcard `@import` directives before compiling.
    #[arg(long, overrides_with = "no_bulk_import")]
    pub bulk_import: bool,

    #[arg(long, hide = true, overrides_with = "bulk_import")]
    pub no_bulk_import: bool,

    /// Rename outputs with a content hash and write a manifest.
    #[arg(long, overrides_with = "no_fingerprint")]
    pub fingerprint: bool,

    #[arg(long, hide = true, overrides_with = "fingerprint")]
    pub no_fingerprint: bool,

    /// Append inline source maps to compiled CSS.
    #[arg(long, overrides_with = "no_source_maps")]
    pub source_maps: bool,

    #[arg(long, hide = true, overrides_with = "source_maps")]
    pub no_source_maps: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STYLEWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the execution plan, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Pipeline overrides requested on the command line. These win over the
    /// config file.
    pub fn pipeline_overrides(&self) -> PipelineOverrides {
        PipelineOverrides {
            variant: self.variant,
            bulk_import: flag_pair(self.bulk_import, self.no_bulk_import),
            fingerprint: flag_pair(self.fingerprint, self.no_fingerprint),
            source_maps: flag_pair(self.source_maps, self.no_source_maps),
        }
    }
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
