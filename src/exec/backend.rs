// src/exec/backend.rs

//! Pluggable compile backend abstraction.
//!
//! The watch runtime talks to a `CompileBackend` instead of calling the
//! pipeline directly. This makes it easy to swap in a fake backend in tests
//! while keeping the production implementation here.
//!
//! - `BlockingCompileBackend` runs [`run_compile`] on Tokio's blocking pool
//!   and reports the outcome back as `RuntimeEvent::CompileFinished`.
//! - Tests can provide their own `CompileBackend` that, for example, records
//!   run ids and directly emits completion events.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::config::BuildConfig;
use crate::engine::{CompileOutcome, RunId, RuntimeEvent};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::pipeline::run_compile;

/// Trait abstracting how compile runs are executed.
pub trait CompileBackend: Send {
    /// Start compile run `run_id`.
    ///
    /// Implementations must eventually send exactly one
    /// `RuntimeEvent::CompileFinished { run_id, .. }` back to the runtime.
    /// The returned future should resolve once the run is dispatched, not
    /// once it completes.
    fn start_compile(
        &mut self,
        run_id: RunId,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real backend used in production.
pub struct BlockingCompileBackend {
    fs: Arc<dyn FileSystem>,
    config: Arc<BuildConfig>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl BlockingCompileBackend {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        config: Arc<BuildConfig>,
        runtime_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            fs,
            config,
            runtime_tx,
        }
    }
}

impl CompileBackend for BlockingCompileBackend {
    fn start_compile(
        &mut self,
        run_id: RunId,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let fs = Arc::clone(&self.fs);
        let config = Arc::clone(&self.config);
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            tokio::spawn(async move {
                let joined =
                    tokio::task::spawn_blocking(move || run_compile(&fs, &config)).await;

                let outcome = match joined {
                    Ok(Ok(report)) => CompileOutcome::Completed {
                        written: report.written.len(),
                        failed: report.failures.len(),
                    },
                    Ok(Err(err)) => {
                        error!(run_id, error = %err, "compile run failed");
                        CompileOutcome::Aborted(err.to_string())
                    }
                    Err(join_err) => {
                        error!(run_id, error = %join_err, "compile run panicked");
                        CompileOutcome::Aborted(join_err.to_string())
                    }
                };

                if let Err(err) = tx
                    .send(RuntimeEvent::CompileFinished { run_id, outcome })
                    .await
                {
                    warn!(run_id, "runtime gone before compile finished: {err}");
                }
            });
            Ok(())
        })
    }
}
