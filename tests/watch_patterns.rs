// tests/watch_patterns.rs

use std::error::Error;
use std::path::PathBuf;

use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind};
use notify::EventKind;
use tokio::sync::mpsc;

use stylewatch::errors::StylewatchError;
use stylewatch::fs::mock::MockFileSystem;
use stylewatch::fs::FileSystem;
use stylewatch::watch::event_handler::is_relevant;
use stylewatch::watch::{
    collect_matching_files, spawn_watcher, ChangeFilter, ContentGate, WatchProfile,
};
use stylewatch_test_utils::builders::{ConfigFileBuilder, MockProject, ROOT};

type TestResult = Result<(), Box<dyn Error>>;

fn default_profile() -> WatchProfile {
    WatchProfile::new(
        &["static/stylesheets/**/*.scss".to_string()],
        &["static/stylesheets/vendor/**".to_string()],
    )
    .unwrap()
}

fn modify() -> EventKind {
    EventKind::Modify(ModifyKind::Data(DataChange::Content))
}

#[test]
fn broad_set_covers_partials_and_nested_files() {
    let profile = default_profile();

    assert!(profile.matches("static/stylesheets/app.scss"));
    assert!(profile.matches("static/stylesheets/_variables.scss"));
    assert!(profile.matches("static/stylesheets/components/deep/_button.scss"));
    assert!(!profile.matches("static/stylesheets/vendor/reset.scss"));
    assert!(!profile.matches("static/stylesheets/app.css"));
    assert!(!profile.matches("static/bundles/app.scss"));
}

#[test]
fn base_dirs_drop_nested_bases() {
    let profile = WatchProfile::new(
        &[
            "./static/stylesheets/**/*.scss".to_string(),
            "static/stylesheets/components/*.scss".to_string(),
            "themes/*.scss".to_string(),
        ],
        &[],
    )
    .unwrap();

    assert_eq!(
        profile.base_dirs(),
        vec![PathBuf::from("static/stylesheets"), PathBuf::from("themes")]
    );
}

#[test]
fn matching_files_are_sorted_and_filtered() -> TestResult {
    let project = MockProject::new();
    project
        .stylesheet("b.scss", "")
        .stylesheet("a.scss", "")
        .stylesheet("vendor/reset.scss", "")
        .stylesheet("notes.md", "");

    let files = collect_matching_files(&project.fs, &project.root(), &default_profile())?;
    assert_eq!(
        files,
        vec![project.stylesheets().join("a.scss"), project.stylesheets().join("b.scss")]
    );
    Ok(())
}

#[test]
fn only_content_events_are_relevant() {
    assert!(is_relevant(&modify()));
    assert!(is_relevant(&EventKind::Create(CreateKind::File)));
    assert!(is_relevant(&EventKind::Remove(RemoveKind::File)));
    assert!(!is_relevant(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime))));
    assert!(!is_relevant(&EventKind::Access(AccessKind::Read)));
}

#[test]
fn filter_reports_first_matching_path_once() {
    let root = PathBuf::from(ROOT);
    let mut filter = ChangeFilter::new(root.clone(), default_profile(), None);

    let paths = vec![
        root.join("static/bundles/app.css"),
        root.join("static/stylesheets/_vars.scss"),
        root.join("static/stylesheets/app.scss"),
    ];
    assert_eq!(
        filter.evaluate(&modify(), &paths),
        Some("static/stylesheets/_vars.scss".to_string())
    );

    // Output written by the compiler never retriggers it.
    assert_eq!(filter.evaluate(&modify(), &[root.join("static/bundles/app.css")]), None);
    assert_eq!(
        filter.evaluate(
            &EventKind::Access(AccessKind::Read),
            &[root.join("static/stylesheets/app.scss")]
        ),
        None
    );
}

#[test]
fn content_gate_skips_saves_without_edits() -> TestResult {
    let project = MockProject::new();
    project.stylesheet("app.scss", ".a { b: c; }");
    let app = project.stylesheets().join("app.scss");

    let mut gate = ContentGate::new(project.shared_fs(), project.root(), default_profile());
    gate.prime()?;

    assert!(!gate.has_changed(std::slice::from_ref(&app))?);

    project.stylesheet("app.scss", ".a { b: d; }");
    assert!(gate.has_changed(std::slice::from_ref(&app))?);
    assert!(!gate.has_changed(std::slice::from_ref(&app))?);

    // A new partial changes the aggregate even though it is not compiled.
    project.stylesheet("_new.scss", "");
    assert!(gate.has_changed(&[project.stylesheets().join("_new.scss")])?);
    Ok(())
}

#[test]
fn filter_with_gate_drops_unchanged_content() -> TestResult {
    let project = MockProject::new();
    project.stylesheet("app.scss", ".a { b: c; }");
    let app = project.stylesheets().join("app.scss");

    let mut gate = ContentGate::new(project.shared_fs(), project.root(), default_profile());
    gate.prime()?;
    let mut filter = ChangeFilter::new(project.root(), default_profile(), Some(gate));

    assert_eq!(filter.evaluate(&modify(), std::slice::from_ref(&app)), None);

    project.stylesheet("app.scss", ".a { b: e; }");
    assert_eq!(
        filter.evaluate(&modify(), std::slice::from_ref(&app)),
        Some("static/stylesheets/app.scss".to_string())
    );
    Ok(())
}

#[test]
fn missing_watch_directory_is_a_registration_error() {
    let fs = MockFileSystem::new();
    fs.add_dir(ROOT);
    let shared: std::sync::Arc<dyn FileSystem> = std::sync::Arc::new(fs);
    let cfg = ConfigFileBuilder::new().resolve(ROOT);
    let (tx, _rx) = mpsc::channel(1);

    match spawn_watcher(shared, &cfg, tx) {
        Err(StylewatchError::WatchRegistration { path, reason }) => {
            assert_eq!(path, PathBuf::from(ROOT).join("static/stylesheets"));
            assert!(reason.contains("does not exist"));
        }
        other => panic!("expected registration error, got {other:?}"),
    }
}
