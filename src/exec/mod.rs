// src/exec/mod.rs

//! Compile execution layer.
//!
//! - [`backend`] provides the `CompileBackend` trait used by the watch
//!   runtime and the production `BlockingCompileBackend`.
//! - [`tasks`] runs an execution plan: `compile` inline, `watch` through the
//!   runtime and watcher.

pub mod backend;
pub mod tasks;

pub use backend::{BlockingCompileBackend, CompileBackend};
pub use tasks::{run_plan, run_watch, TaskContext};
