// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_explicit_or_default, BuildConfig};
use crate::dag::{PlannedTask, TaskGraph};
use crate::exec::{run_plan, TaskContext};
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - task resolution into a sequential plan
/// - the compile pipeline / watch runtime via `exec::run_plan`
pub async fn run(args: CliArgs) -> Result<()> {
    let explicit = args.config.as_deref().map(Path::new);
    let (cfg, config_path) = load_explicit_or_default(explicit)?;

    let root = project_root(config_path.as_deref());
    let build = BuildConfig::resolve(&cfg, &root, &args.pipeline_overrides());
    debug!(?build, "resolved build configuration");

    let graph = TaskGraph::from_config(&cfg);
    let plan = graph.execution_plan(&args.task)?;

    if args.dry_run {
        print_dry_run(&build, &args.task, &plan);
        return Ok(());
    }

    info!(
        task = %args.task,
        plan = ?plan.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        "running task"
    );

    let ctx = TaskContext::new(Arc::new(RealFileSystem), build);
    run_plan(&ctx, &plan).await?;
    Ok(())
}

/// Figure out the project root that relative paths are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "site/Stylewatch.toml"),
///   we use that directory.
/// - Otherwise (bare filename or no config file at all) we use the current
///   working directory.
fn project_root(config_path: Option<&Path>) -> PathBuf {
    match config_path.and_then(Path::parent) {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Print the resolved settings and execution plan without running anything.
fn print_dry_run(build: &BuildConfig, task: &str, plan: &[PlannedTask]) {
    println!("stylewatch dry-run");
    println!("  root = {}", build.root.display());
    println!("  build = {:?}", build.build);
    println!("  watch = {:?}", build.watch);
    if !build.exclude.is_empty() {
        println!("  exclude = {:?}", build.exclude);
    }
    println!("  bundle_dir = {}", build.bundle_dir.display());
    println!(
        "  stages: bulk_import={} fingerprint={} source_maps={}",
        build.flags.bulk_import, build.flags.fingerprint, build.flags.source_maps
    );
    if build.flags.fingerprint {
        println!("  manifest = {}", build.manifest_path().display());
    }
    println!(
        "  watch.triggered_while_running_behaviour = {:?}",
        build.behaviour
    );
    println!();

    println!("plan for '{task}' ({} steps):", plan.len());
    for (idx, step) in plan.iter().enumerate() {
        let note = step
            .description
            .as_deref()
            .map(|text| format!(": {text}"))
            .unwrap_or_default();
        println!("  {}. {} ({:?}){note}", idx + 1, step.name, step.body);
    }

    debug!("dry-run complete (no execution)");
}
