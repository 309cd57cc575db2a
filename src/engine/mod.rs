// src/engine/mod.rs

//! Watch-mode scheduling.
//!
//! [`core::WatchCore`] is a synchronous state machine that owns the
//! in-flight guard: one compile at a time, at most one queued behind it.
//! [`runtime::Runtime`] is the Tokio loop that feeds it change, completion
//! and shutdown events and hands compile runs to a backend.

/// Monotonic identifier of one compile run inside a watch session.
pub type RunId = u64;

/// Result of a compile run as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The run finished; some stylesheets may have been skipped.
    Completed { written: usize, failed: usize },
    /// The run hit a fatal error (e.g. unwritable bundle directory).
    Aborted(String),
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, stop once a compile finishes with nothing pending.
    pub exit_when_idle: bool,
}

/// Events flowing into the runtime from the watcher, the backend, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A watched file changed. `path` is relative to the project root.
    ChangeDetected { path: String },
    /// A compile run finished.
    CompileFinished {
        run_id: RunId,
        outcome: CompileOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod runtime;

pub use core::{CoreCommand, CoreStep, WatchCore, WatchState};
pub use crate::types::TriggerWhileRunningBehaviour;
pub use runtime::Runtime;
