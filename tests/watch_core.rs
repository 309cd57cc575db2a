// tests/watch_core.rs

use stylewatch::engine::{
    CompileOutcome, CoreCommand, RuntimeEvent, RuntimeOptions, TriggerWhileRunningBehaviour,
    WatchCore, WatchState,
};

fn change(path: &str) -> RuntimeEvent {
    RuntimeEvent::ChangeDetected {
        path: path.to_string(),
    }
}

fn finished(run_id: u64) -> RuntimeEvent {
    RuntimeEvent::CompileFinished {
        run_id,
        outcome: CompileOutcome::Completed {
            written: 1,
            failed: 0,
        },
    }
}

fn queue_core() -> WatchCore {
    WatchCore::new(TriggerWhileRunningBehaviour::Queue, RuntimeOptions::default())
}

#[test]
fn change_while_armed_starts_a_run() {
    let mut core = queue_core();
    assert!(core.is_armed());

    let step = core.step(change("static/stylesheets/a.scss"));
    assert!(step.keep_running);
    assert_eq!(step.commands, vec![CoreCommand::StartCompile { run_id: 1 }]);
    assert_eq!(
        core.state(),
        WatchState::Processing {
            run_id: 1,
            pending: false
        }
    );
}

#[test]
fn burst_during_a_run_collapses_into_one_follow_up() {
    let mut core = queue_core();
    core.step(change("a.scss"));

    for path in ["b.scss", "c.scss", "_d.scss"] {
        assert!(core.step(change(path)).commands.is_empty());
    }
    assert!(core.has_pending());

    let step = core.step(finished(1));
    assert_eq!(step.commands, vec![CoreCommand::StartCompile { run_id: 2 }]);
    assert!(!core.has_pending());

    let step = core.step(finished(2));
    assert!(step.commands.is_empty());
    assert!(step.keep_running);
    assert!(core.is_armed());
    assert_eq!(core.runs_started(), 2);
}

#[test]
fn ignore_drops_changes_during_a_run() {
    let mut core = WatchCore::new(TriggerWhileRunningBehaviour::Ignore, RuntimeOptions::default());
    core.step(change("a.scss"));
    core.step(change("b.scss"));
    assert!(!core.has_pending());

    assert!(core.step(finished(1)).commands.is_empty());
    assert!(core.is_armed());

    // Armed again, so the next change starts a run.
    assert_eq!(
        core.step(change("c.scss")).commands,
        vec![CoreCommand::StartCompile { run_id: 2 }]
    );
}

#[test]
fn failed_stylesheets_do_not_stop_the_watch() {
    let mut core = queue_core();
    core.step(change("a.scss"));

    let step = core.step(RuntimeEvent::CompileFinished {
        run_id: 1,
        outcome: CompileOutcome::Completed {
            written: 0,
            failed: 3,
        },
    });
    assert!(step.keep_running);
    assert!(core.is_armed());
}

#[test]
fn aborted_run_stops_with_reason() {
    let mut core = queue_core();
    core.step(change("a.scss"));
    core.step(change("b.scss"));

    let step = core.step(RuntimeEvent::CompileFinished {
        run_id: 1,
        outcome: CompileOutcome::Aborted("bundle dir not writable".to_string()),
    });
    assert!(!step.keep_running);
    assert_eq!(
        step.commands,
        vec![CoreCommand::Abort("bundle dir not writable".to_string())]
    );
}

#[test]
fn stale_completion_is_ignored() {
    let mut core = queue_core();
    core.step(change("a.scss"));

    let step = core.step(finished(7));
    assert!(step.keep_running);
    assert!(step.commands.is_empty());
    assert_eq!(
        core.state(),
        WatchState::Processing {
            run_id: 1,
            pending: false
        }
    );

    // Completion while armed is stale too.
    core.step(finished(1));
    assert!(core.step(finished(1)).commands.is_empty());
    assert!(core.is_armed());
}

#[test]
fn shutdown_exits() {
    let mut core = queue_core();
    let step = core.step(RuntimeEvent::ShutdownRequested);
    assert!(!step.keep_running);
    assert_eq!(step.commands, vec![CoreCommand::RequestExit]);
}

#[test]
fn exit_when_idle_stops_after_last_run() {
    let mut core = WatchCore::new(
        TriggerWhileRunningBehaviour::Queue,
        RuntimeOptions {
            exit_when_idle: true,
        },
    );
    core.step(change("a.scss"));
    core.step(change("b.scss"));

    assert!(core.step(finished(1)).keep_running);
    let step = core.step(finished(2));
    assert!(!step.keep_running);
    assert_eq!(step.commands, vec![CoreCommand::RequestExit]);
}
