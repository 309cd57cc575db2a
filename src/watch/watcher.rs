// src/watch/watcher.rs

use std::sync::{Arc, Mutex};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::BuildConfig;
use crate::engine::RuntimeEvent;
use crate::errors::{Result, StylewatchError};
use crate::fs::FileSystem;
use crate::watch::event_handler::{process_event, ChangeFilter};
use crate::watch::hash::ContentGate;
use crate::watch::patterns::WatchProfile;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Start watching the base directories of the watch patterns and forward
/// one `RuntimeEvent::ChangeDetected` per matching notify event.
///
/// Fails if any base directory is missing or cannot be registered.
pub fn spawn_watcher(
    fs: Arc<dyn FileSystem>,
    config: &BuildConfig,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    // Canonicalize once so event paths and the root share a prefix.
    let root = fs
        .canonicalize(&config.root)
        .unwrap_or_else(|_| config.root.clone());

    let profile = WatchProfile::from_config(config)?;

    let dirs: Vec<_> = profile.base_dirs().into_iter().map(|d| root.join(d)).collect();
    for dir in &dirs {
        if !fs.is_dir(dir) {
            return Err(StylewatchError::WatchRegistration {
                path: dir.clone(),
                reason: "directory does not exist".to_string(),
            });
        }
    }

    let gate = if config.use_hash {
        let mut gate = ContentGate::new(Arc::clone(&fs), root.clone(), profile.clone());
        if let Err(err) = gate.prime() {
            warn!(error = %err, "failed to compute initial content hash");
        }
        Some(gate)
    } else {
        None
    };
    let filter = Arc::new(Mutex::new(ChangeFilter::new(root.clone(), profile, gate)));

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // Not inside a tracing span here; stderr is the fallback.
                    eprintln!("stylewatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("stylewatch: file watch error: {err}");
            }
        },
        Config::default(),
    )
    .map_err(|e| StylewatchError::WatchRegistration {
        path: root.clone(),
        reason: e.to_string(),
    })?;

    for dir in &dirs {
        watcher
            .watch(dir, RecursiveMode::Recursive)
            .map_err(|e| StylewatchError::WatchRegistration {
                path: dir.clone(),
                reason: e.to_string(),
            })?;
        info!("file watcher started on {:?}", dir);
    }

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");
            if !process_event(Arc::clone(&filter), event, &runtime_tx).await {
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
