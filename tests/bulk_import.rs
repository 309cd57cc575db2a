// tests/bulk_import.rs

use std::error::Error;
use std::path::Path;

use stylewatch::fs::mock::MockFileSystem;
use stylewatch::pipeline::bulk_import::expand_bulk_imports;
use stylewatch::pipeline::run_compile;
use stylewatch::types::Variant;
use stylewatch_test_utils::builders::{ConfigFileBuilder, MockProject, ROOT};

type TestResult = Result<(), Box<dyn Error>>;

const DIR: &str = "/site/static/stylesheets";

fn project_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file(format!("{DIR}/components/_forms.scss"), ".form {}");
    fs.add_file(format!("{DIR}/components/_buttons.scss"), ".button {}");
    fs.add_file(format!("{DIR}/components/notes.txt"), "not a stylesheet");
    fs.add_file(format!("{DIR}/components/legacy/_old.scss"), ".old {}");
    fs
}

#[test]
fn single_star_lists_direct_children_sorted() -> TestResult {
    let fs = project_fs();
    let out = expand_bulk_imports(
        &fs,
        Path::new(DIR),
        "@import \"components/*\";\n.x { y: z; }\n",
    )?;

    assert_eq!(
        out,
        "@import \"components/_buttons.scss\";\n@import \"components/_forms.scss\";\n.x { y: z; }\n"
    );
    Ok(())
}

#[test]
fn double_star_recurses_and_filters_by_extension() -> TestResult {
    let fs = project_fs();
    let out = expand_bulk_imports(&fs, Path::new(DIR), "@import 'components/**/*.scss';")?;

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "@import \"components/_buttons.scss\";",
            "@import \"components/_forms.scss\";",
            "@import \"components/legacy/_old.scss\";",
        ]
    );
    assert!(!out.contains("notes.txt"));
    Ok(())
}

#[test]
fn plain_imports_are_left_alone() -> TestResult {
    let fs = project_fs();
    let source = "@import \"components/buttons\";\n@use 'sass:math';\n";
    assert_eq!(expand_bulk_imports(&fs, Path::new(DIR), source)?, source);
    Ok(())
}

#[test]
fn comma_list_expands_wildcards_and_keeps_plain_items() -> TestResult {
    let fs = project_fs();
    let source = "@import \"base\", \"components/*\",\n  'theme';\n.x { y: z; }\n";
    let out = expand_bulk_imports(&fs, Path::new(DIR), source)?;

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "@import \"base\";",
            "@import \"components/_buttons.scss\";",
            "@import \"components/_forms.scss\";",
            "@import 'theme';",
            ".x { y: z; }",
        ]
    );
    Ok(())
}

#[test]
fn plain_comma_lists_are_left_alone() -> TestResult {
    let fs = project_fs();
    let source = "@import \"base\", 'theme';\n";
    assert_eq!(expand_bulk_imports(&fs, Path::new(DIR), source)?, source);
    Ok(())
}

#[test]
fn missing_directory_expands_to_nothing() -> TestResult {
    let fs = project_fs();
    let out = expand_bulk_imports(&fs, Path::new(DIR), "@import \"vendor/*\";\n.a { b: c; }")?;
    assert_eq!(out, "\n.a { b: c; }");
    Ok(())
}

#[test]
fn expanded_partials_are_compiled_into_the_bundle() -> TestResult {
    let project = MockProject::new();
    project
        .stylesheet("app.scss", "@import \"components/*\";\n")
        .stylesheet("components/_alert.scss", ".alert { color: red; }\n")
        .stylesheet("components/_badge.scss", ".badge { color: blue; }\n");

    let cfg = ConfigFileBuilder::new().variant(Variant::A).resolve(ROOT);
    let report = run_compile(&project.shared_fs(), &cfg)?;
    assert!(report.is_clean(), "failures: {:?}", report.failures);

    let css = project.bundle("app.css").unwrap();
    let alert = css.find(".alert").unwrap();
    let badge = css.find(".badge").unwrap();
    assert!(alert < badge);
    Ok(())
}

#[test]
fn wildcard_import_fails_to_compile_without_expansion() -> TestResult {
    let project = MockProject::new();
    project
        .stylesheet("app.scss", "@import \"components/*\";\n")
        .stylesheet("components/_alert.scss", ".alert { color: red; }\n");

    // Variant C has no bulk-import stage.
    let cfg = ConfigFileBuilder::new().variant(Variant::C).resolve(ROOT);
    let report = run_compile(&project.shared_fs(), &cfg)?;

    assert_eq!(report.failures.len(), 1);
    assert!(project.bundle("app.css").is_none());
    Ok(())
}
