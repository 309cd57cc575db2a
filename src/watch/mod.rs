// src/watch/mod.rs

//! The filesystem half of the `watch` task.
//!
//! [`watcher`] registers `notify` on the base directories of the watch
//! globs. Raw events pass through a [`ChangeFilter`] (glob match, exclude
//! list, optional [`ContentGate`]) and come out as at most one
//! `RuntimeEvent::ChangeDetected` each. Whether that starts a compile is up
//! to the engine.

pub mod cache;
pub mod event_handler;
pub mod hash;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use event_handler::ChangeFilter;
pub use hash::{compute_file_hash, ContentGate};
pub use patterns::{collect_matching_files, WatchProfile};
pub use watcher::{spawn_watcher, WatcherHandle};
