// tests/runtime_fake_backend.rs

use std::error::Error;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use stylewatch::engine::{
    CompileOutcome, Runtime, RuntimeEvent, RuntimeOptions, TriggerWhileRunningBehaviour,
    WatchCore,
};
use stylewatch_test_utils::fake_backend::{FakeCompileBackend, ManualCompileBackend};
use stylewatch_test_utils::{init_tracing, wait_until, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn change(path: &str) -> RuntimeEvent {
    RuntimeEvent::ChangeDetected {
        path: path.to_string(),
    }
}

fn exit_when_idle(behaviour: TriggerWhileRunningBehaviour) -> WatchCore {
    WatchCore::new(
        behaviour,
        RuntimeOptions {
            exit_when_idle: true,
        },
    )
}

#[tokio::test]
async fn single_change_runs_one_compile() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeCompileBackend::new(tx.clone(), Arc::clone(&started));

    let runtime = Runtime::new(exit_when_idle(TriggerWhileRunningBehaviour::Queue), rx, backend);
    tx.send(change("static/stylesheets/a.scss")).await?;

    let core = with_timeout(runtime.run()).await?;
    assert_eq!(*started.lock().unwrap(), vec![1]);
    assert!(core.is_armed());
    Ok(())
}

#[tokio::test]
async fn changes_during_a_run_coalesce_into_one_follow_up() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = ManualCompileBackend::new(Arc::clone(&started));

    let runtime = Runtime::new(exit_when_idle(TriggerWhileRunningBehaviour::Queue), rx, backend);
    let handle = tokio::spawn(runtime.run());

    tx.send(change("a.scss")).await?;
    tx.send(change("b.scss")).await?;
    tx.send(change("c.scss")).await?;
    tx.send(RuntimeEvent::CompileFinished {
        run_id: 1,
        outcome: CompileOutcome::Completed { written: 1, failed: 0 },
    })
    .await?;

    // Wait for the follow-up to be dispatched before finishing it.
    wait_until(|| started.lock().unwrap().len() == 2).await;

    tx.send(RuntimeEvent::CompileFinished {
        run_id: 2,
        outcome: CompileOutcome::Completed { written: 1, failed: 0 },
    })
    .await?;

    let core = with_timeout(handle).await??;
    assert_eq!(*started.lock().unwrap(), vec![1, 2]);
    assert_eq!(core.runs_started(), 2);
    Ok(())
}

#[tokio::test]
async fn ignore_behaviour_drops_changes_while_running() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = ManualCompileBackend::new(Arc::clone(&started));

    let runtime = Runtime::new(exit_when_idle(TriggerWhileRunningBehaviour::Ignore), rx, backend);
    let handle = tokio::spawn(runtime.run());

    tx.send(change("a.scss")).await?;
    tx.send(change("b.scss")).await?;
    tx.send(RuntimeEvent::CompileFinished {
        run_id: 1,
        outcome: CompileOutcome::Completed { written: 1, failed: 0 },
    })
    .await?;

    let core = with_timeout(handle).await??;
    assert_eq!(*started.lock().unwrap(), vec![1]);
    assert!(core.is_armed());
    Ok(())
}

#[tokio::test]
async fn aborted_compile_stops_the_runtime_with_an_error() -> TestResult {
    init_tracing();

    let (tx, rx) = mpsc::channel(16);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = FakeCompileBackend::new(tx.clone(), Arc::clone(&started))
        .with_outcome(CompileOutcome::Aborted("Permission denied".to_string()));

    let runtime = Runtime::new(
        WatchCore::new(TriggerWhileRunningBehaviour::Queue, RuntimeOptions::default()),
        rx,
        backend,
    );
    tx.send(change("a.scss")).await?;

    let err = with_timeout(runtime.run()).await.unwrap_err();
    assert!(err.to_string().contains("Permission denied"), "{err}");
    Ok(())
}

#[tokio::test]
async fn shutdown_request_ends_an_idle_runtime() -> TestResult {
    let (tx, rx) = mpsc::channel(16);
    let started = Arc::new(Mutex::new(Vec::new()));
    let backend = ManualCompileBackend::new(Arc::clone(&started));

    let runtime = Runtime::new(
        WatchCore::new(TriggerWhileRunningBehaviour::Queue, RuntimeOptions::default()),
        rx,
        backend,
    );
    tx.send(RuntimeEvent::ShutdownRequested).await?;

    let core = with_timeout(runtime.run()).await?;
    assert_eq!(core.runs_started(), 0);
    assert!(started.lock().unwrap().is_empty());
    Ok(())
}
