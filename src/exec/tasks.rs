// src/exec/tasks.rs

use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::BuildConfig;
use crate::dag::{PlannedTask, TaskBody};
use crate::engine::{Runtime, RuntimeEvent, RuntimeOptions, WatchCore};
use crate::errors::Result;
use crate::exec::backend::BlockingCompileBackend;
use crate::fs::FileSystem;
use crate::pipeline::{run_compile, CompileReport};
use crate::watch::spawn_watcher;

/// Everything a task body needs. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub fs: Arc<dyn FileSystem>,
    pub config: Arc<BuildConfig>,
}

impl TaskContext {
    pub fn new(fs: Arc<dyn FileSystem>, config: BuildConfig) -> Self {
        Self {
            fs,
            config: Arc::new(config),
        }
    }
}

/// Run every task of a plan, strictly one after another.
///
/// Each task finishes before the next starts; a `watch` task only returns
/// on shutdown, so anything planned after it runs then.
pub async fn run_plan(ctx: &TaskContext, plan: &[PlannedTask]) -> Result<()> {
    for task in plan {
        info!(task = %task.name, "starting task");
        match task.body {
            TaskBody::Compile => {
                let report = run_compile_blocking(ctx).await?;
                if !report.is_clean() {
                    warn!(
                        task = %task.name,
                        failed = report.failures.len(),
                        "some stylesheets failed to compile"
                    );
                }
            }
            TaskBody::Watch => run_watch(ctx).await?,
            TaskBody::Composite => {
                debug!(task = %task.name, "composite task has no body");
            }
        }
        info!(task = %task.name, "finished task");
    }
    Ok(())
}

async fn run_compile_blocking(ctx: &TaskContext) -> Result<CompileReport> {
    let fs = Arc::clone(&ctx.fs);
    let config = Arc::clone(&ctx.config);
    tokio::task::spawn_blocking(move || run_compile(&fs, &config))
        .await
        .map_err(|e| anyhow!("compile task panicked: {e}"))?
}

/// The `watch` task: arm the watcher and recompile on change until Ctrl-C.
pub async fn run_watch(ctx: &TaskContext) -> Result<()> {
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let _watcher = spawn_watcher(Arc::clone(&ctx.fs), &ctx.config, rt_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let backend =
        BlockingCompileBackend::new(Arc::clone(&ctx.fs), Arc::clone(&ctx.config), rt_tx);
    let core = WatchCore::new(ctx.config.behaviour, RuntimeOptions::default());

    info!("watching for stylesheet changes (Ctrl-C to stop)");
    Runtime::new(core, rt_rx, backend).run().await?;
    Ok(())
}
