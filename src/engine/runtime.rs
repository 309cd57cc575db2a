// src/engine/runtime.rs

use std::fmt;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::{Result, StylewatchError};
use crate::exec::CompileBackend;

use super::core::{CoreCommand, WatchCore};
use super::RuntimeEvent;

/// Async shell around [`WatchCore`].
///
/// Pulls events off the channel, feeds them to the core and carries out
/// the returned commands. Compile runs are handed to the backend, which
/// reports back through the same channel.
pub struct Runtime<B: CompileBackend> {
    core: WatchCore,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    backend: B,
}

impl<B: CompileBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: CompileBackend> Runtime<B> {
    pub fn new(core: WatchCore, event_rx: mpsc::Receiver<RuntimeEvent>, backend: B) -> Self {
        Self {
            core,
            event_rx,
            backend,
        }
    }

    /// Process events until the core stops or every sender is dropped.
    ///
    /// Returns the final core state; an aborted compile run becomes an
    /// error.
    pub async fn run(mut self) -> Result<WatchCore> {
        debug!(state = ?self.core.state(), "watch runtime started");

        while let Some(event) = self.event_rx.recv().await {
            let step = self.core.step(event);

            for command in step.commands {
                match command {
                    CoreCommand::StartCompile { run_id } => {
                        debug!(run_id, "dispatching compile run");
                        self.backend.start_compile(run_id).await?;
                    }
                    CoreCommand::RequestExit => {}
                    CoreCommand::Abort(reason) => {
                        return Err(StylewatchError::Other(anyhow!(
                            "compile aborted, stopping watch: {reason}"
                        )));
                    }
                }
            }

            if !step.keep_running {
                break;
            }
        }

        info!(runs = self.core.runs_started(), "watch runtime stopped");
        Ok(self.core)
    }
}
