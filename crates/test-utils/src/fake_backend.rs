use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use stylewatch::engine::{CompileOutcome, RunId, RuntimeEvent};
use stylewatch::errors::Result;
use stylewatch::exec::CompileBackend;

/// A fake backend that:
/// - records the id of every compile run it is asked to start
/// - immediately reports `CompileFinished` with the configured outcome.
pub struct FakeCompileBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    started: Arc<Mutex<Vec<RunId>>>,
    outcome: CompileOutcome,
}

impl FakeCompileBackend {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, started: Arc<Mutex<Vec<RunId>>>) -> Self {
        Self {
            runtime_tx,
            started,
            outcome: CompileOutcome::Completed {
                written: 1,
                failed: 0,
            },
        }
    }

    pub fn with_outcome(mut self, outcome: CompileOutcome) -> Self {
        self.outcome = outcome;
        self
    }
}

impl CompileBackend for FakeCompileBackend {
    fn start_compile(
        &mut self,
        run_id: RunId,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let started = Arc::clone(&self.started);
        let outcome = self.outcome.clone();

        Box::pin(async move {
            started.lock().unwrap().push(run_id);
            tx.send(RuntimeEvent::CompileFinished { run_id, outcome })
                .await
                .map_err(anyhow::Error::from)?;
            Ok(())
        })
    }
}

/// A backend that only records starts; the test sends `CompileFinished`
/// itself to control timing.
pub struct ManualCompileBackend {
    started: Arc<Mutex<Vec<RunId>>>,
}

impl ManualCompileBackend {
    pub fn new(started: Arc<Mutex<Vec<RunId>>>) -> Self {
        Self { started }
    }
}

impl CompileBackend for ManualCompileBackend {
    fn start_compile(
        &mut self,
        run_id: RunId,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let started = Arc::clone(&self.started);
        Box::pin(async move {
            started.lock().unwrap().push(run_id);
            Ok(())
        })
    }
}
