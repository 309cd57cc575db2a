// src/watch/event_handler.rs

//! Event processing logic for file system changes.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use notify::event::ModifyKind;
use notify::EventKind;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::RuntimeEvent;
use crate::watch::hash::ContentGate;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::WatchProfile;

/// Content changes, creations and removals count; access and pure metadata
/// events do not.
pub fn is_relevant(kind: &EventKind) -> bool {
    match kind {
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any => true,
        _ => false,
    }
}

/// Decides whether a raw notify event should start a compile.
#[derive(Debug)]
pub struct ChangeFilter {
    root: PathBuf,
    profile: WatchProfile,
    gate: Option<ContentGate>,
}

impl ChangeFilter {
    pub fn new(root: PathBuf, profile: WatchProfile, gate: Option<ContentGate>) -> Self {
        Self {
            root,
            profile,
            gate,
        }
    }

    /// Returns the first watched path (root-relative) if this event should
    /// trigger exactly one compile, or `None` to drop it.
    pub fn evaluate(&mut self, kind: &EventKind, paths: &[PathBuf]) -> Option<String> {
        if !is_relevant(kind) {
            return None;
        }

        let mut matched = Vec::new();
        let mut first = None;
        for path in paths {
            let Some(rel) = relative_str(&self.root, path) else {
                warn!("could not relativize path {:?} against root {:?}", path, self.root);
                continue;
            };
            if self.profile.matches(&rel) {
                first.get_or_insert(rel);
                matched.push(path.clone());
            }
        }

        let first = first?;

        if let Some(gate) = self.gate.as_mut() {
            match gate.has_changed(&matched) {
                Ok(false) => return None,
                Ok(true) => {}
                Err(err) => {
                    warn!(error = %err, "failed to hash watched files; compiling anyway");
                }
            }
        }

        Some(first)
    }
}

/// Run one notify event through the filter and, if it passes, send a single
/// `ChangeDetected` to the runtime.
///
/// Returns false once the runtime channel is closed.
pub async fn process_event(
    filter: Arc<Mutex<ChangeFilter>>,
    event: notify::Event,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> bool {
    let decision = tokio::task::spawn_blocking(move || {
        let mut filter = match filter.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        filter.evaluate(&event.kind, &event.paths)
    })
    .await;

    let path = match decision {
        Ok(Some(path)) => path,
        Ok(None) => return true,
        Err(err) => {
            warn!(error = %err, "change filter panicked; dropping event");
            return true;
        }
    };

    debug!(path = %path, "watch match -> requesting compile");
    if let Err(err) = runtime_tx
        .send(RuntimeEvent::ChangeDetected { path })
        .await
    {
        warn!("failed to send RuntimeEvent::ChangeDetected: {err}");
        return false;
    }
    true
}
