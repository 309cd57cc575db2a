// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - handing compile requests to the backend
//! - handling Ctrl+C / shutdown
//!
//! The core is tested without any Tokio, channels, filesystem, or processes.

use tracing::{debug, info, warn};

use crate::engine::{CompileOutcome, RunId, RuntimeEvent, RuntimeOptions};
use crate::types::TriggerWhileRunningBehaviour;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Start compile run `run_id`.
    StartCompile { run_id: RunId },
    /// Stop the runtime normally.
    RequestExit,
    /// Stop the runtime with an error.
    Abort(String),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn keep(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    fn stop(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: false,
        }
    }
}

/// Watch session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Listening; no compile in flight.
    Armed,
    /// One compile in flight. `pending` is the single follow-up slot.
    Processing { run_id: RunId, pending: bool },
}

/// In-flight guard for the watch loop.
///
/// At most one compile runs at a time. Changes seen while a compile is in
/// flight either fill the single pending slot (`queue`) or are dropped
/// (`ignore`). However many changes arrive during one run, at most one
/// follow-up run is started.
#[derive(Debug)]
pub struct WatchCore {
    state: WatchState,
    behaviour: TriggerWhileRunningBehaviour,
    options: RuntimeOptions,
    last_run_id: RunId,
}

impl WatchCore {
    pub fn new(behaviour: TriggerWhileRunningBehaviour, options: RuntimeOptions) -> Self {
        Self {
            state: WatchState::Armed,
            behaviour,
            options,
            last_run_id: 0,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == WatchState::Armed
    }

    pub fn has_pending(&self) -> bool {
        matches!(self.state, WatchState::Processing { pending: true, .. })
    }

    /// Number of compile runs started so far.
    pub fn runs_started(&self) -> u64 {
        self.last_run_id
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::ChangeDetected { path } => self.handle_change(&path),
            RuntimeEvent::CompileFinished { run_id, outcome } => {
                self.handle_finished(run_id, outcome)
            }
            RuntimeEvent::ShutdownRequested => {
                info!("shutdown requested");
                CoreStep::stop(vec![CoreCommand::RequestExit])
            }
        }
    }

    fn start_run(&mut self) -> CoreCommand {
        self.last_run_id += 1;
        let run_id = self.last_run_id;
        self.state = WatchState::Processing {
            run_id,
            pending: false,
        };
        CoreCommand::StartCompile { run_id }
    }

    fn handle_change(&mut self, path: &str) -> CoreStep {
        match (self.state, self.behaviour) {
            (WatchState::Armed, _) => {
                debug!(path, "change while armed; starting compile");
                CoreStep::keep(vec![self.start_run()])
            }
            (WatchState::Processing { run_id, pending }, TriggerWhileRunningBehaviour::Queue) => {
                if pending {
                    debug!(path, run_id, "change coalesced into pending compile");
                } else {
                    debug!(path, run_id, "change during compile; queued one follow-up");
                }
                self.state = WatchState::Processing {
                    run_id,
                    pending: true,
                };
                CoreStep::keep(Vec::new())
            }
            (WatchState::Processing { run_id, .. }, TriggerWhileRunningBehaviour::Ignore) => {
                debug!(path, run_id, "change during compile ignored");
                CoreStep::keep(Vec::new())
            }
        }
    }

    fn handle_finished(&mut self, finished: RunId, outcome: CompileOutcome) -> CoreStep {
        let pending = match self.state {
            WatchState::Processing { run_id, pending } if run_id == finished => pending,
            other => {
                warn!(finished, state = ?other, "completion for unknown compile run ignored");
                return CoreStep::keep(Vec::new());
            }
        };

        match outcome {
            CompileOutcome::Aborted(reason) => {
                self.state = WatchState::Armed;
                CoreStep::stop(vec![CoreCommand::Abort(reason)])
            }
            CompileOutcome::Completed { written, failed } => {
                info!(run_id = finished, written, failed, "compile run finished");

                if pending {
                    return CoreStep::keep(vec![self.start_run()]);
                }

                self.state = WatchState::Armed;
                if self.options.exit_when_idle {
                    CoreStep::stop(vec![CoreCommand::RequestExit])
                } else {
                    CoreStep::keep(Vec::new())
                }
            }
        }
    }
}
