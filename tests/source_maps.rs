// tests/source_maps.rs

use std::error::Error;

use stylewatch::pipeline::{run_compile, SourceMap};
use stylewatch::types::Variant;
use stylewatch_test_utils::builders::{ConfigFileBuilder, MockProject, ROOT};

type TestResult = Result<(), Box<dyn Error>>;

const SOURCE: &str = "$pad: 4px;\n.card { padding: $pad; .title { margin: 0; } }\n";

#[test]
fn variant_c_appends_an_inline_map() -> TestResult {
    let project = MockProject::new();
    project.stylesheet("cards.scss", SOURCE);

    let cfg = ConfigFileBuilder::new().variant(Variant::C).resolve(ROOT);
    run_compile(&project.shared_fs(), &cfg)?;

    let css = project.bundle("cards.css").unwrap();
    assert!(css.contains(".card {"));
    assert!(css
        .trim_end()
        .lines()
        .last()
        .unwrap()
        .starts_with("/*# sourceMappingURL=data:application/json;charset=utf8;base64,"));

    let map = SourceMap::extract_inline(&css).unwrap();
    assert_eq!(map.version, 3);
    assert_eq!(map.file, "cards.css");
    assert_eq!(map.sources, vec!["cards.scss".to_string()]);
    assert_eq!(map.sources_content, vec![SOURCE.to_string()]);
    assert!(map.mappings.starts_with("AAAA"));
    Ok(())
}

#[test]
fn maps_are_off_by_default() -> TestResult {
    let project = MockProject::new();
    project.stylesheet("cards.scss", SOURCE);

    let cfg = ConfigFileBuilder::new().resolve(ROOT);
    run_compile(&project.shared_fs(), &cfg)?;

    let css = project.bundle("cards.css").unwrap();
    assert!(!css.contains("sourceMappingURL"));
    assert!(SourceMap::extract_inline(&css).is_none());
    Ok(())
}

#[test]
fn map_names_the_unhashed_output_when_fingerprinting() -> TestResult {
    let project = MockProject::new();
    project.stylesheet("cards.scss", SOURCE);

    let cfg = ConfigFileBuilder::new()
        .variant(Variant::B)
        .source_maps(true)
        .resolve(ROOT);
    let report = run_compile(&project.shared_fs(), &cfg)?;

    // Maps are appended before hashing, so the map names the plain output.
    let written = report.written[0]
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap()
        .to_string();
    let css = project.bundle(&written).unwrap();
    let map = SourceMap::extract_inline(&css).unwrap();
    assert_eq!(map.file, "cards.css");
    assert_ne!(written, "cards.css");
    Ok(())
}

#[test]
fn one_mapping_segment_per_generated_line() -> TestResult {
    let css = ".a {\n  b: c;\n}\n";
    let map = SourceMap::file_level("a.css", "a.scss", ".a { b: c; }", css);

    assert_eq!(map.mappings, "AAAA;AAAA;AAAA");
    let comment = map.inline_comment()?;
    let round = SourceMap::extract_inline(&format!("{css}\n{comment}\n")).unwrap();
    assert_eq!(round, map);
    Ok(())
}
