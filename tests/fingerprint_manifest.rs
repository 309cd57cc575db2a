// tests/fingerprint_manifest.rs

use std::error::Error;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use stylewatch::pipeline::fingerprint::{content_token, fingerprinted_path, Fingerprint, TOKEN_LEN};
use stylewatch::pipeline::{FileRecord, Manifest, SourceFile, Stage};

type TestResult = Result<(), Box<dyn Error>>;

fn record(relative: &str, contents: &str) -> FileRecord {
    let source = SourceFile {
        path: Path::new("/site/static/stylesheets").join(relative),
        relative: PathBuf::from(relative),
    };
    let mut record = FileRecord::new(source, contents.to_string());
    record.relative.set_extension("css");
    record
}

#[test]
fn fingerprint_renames_and_remembers_original() -> TestResult {
    let out = Fingerprint.apply(record("pages/home.scss", ".home { margin: 0; }"))?;

    let token = content_token(b".home { margin: 0; }");
    assert_eq!(out.relative, PathBuf::from(format!("pages/home-{token}.css")));
    assert_eq!(out.revision_of, Some(PathBuf::from("pages/home.css")));
    Ok(())
}

#[test]
fn manifest_uses_forward_slashes_and_sorted_keys() -> TestResult {
    let records = vec![
        Fingerprint.apply(record("zeta.scss", ".z {}"))?,
        Fingerprint.apply(record("pages/home.scss", ".h {}"))?,
        Fingerprint.apply(record("alpha.scss", ".a {}"))?,
    ];
    let manifest = Manifest::from_records(&records);

    let keys: Vec<&str> = manifest.entries().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["alpha.css", "pages/home.css", "zeta.css"]);

    let json = manifest.to_json()?;
    assert!(json.starts_with("{\n  \"alpha.css\": \"alpha-"));
    assert!(json.ends_with("}\n"));
    assert_eq!(Manifest::from_json(&json)?, manifest);
    Ok(())
}

#[test]
fn records_without_fingerprint_are_left_out() {
    let plain = record("plain.scss", ".p {}");
    assert!(Manifest::from_records([&plain]).is_empty());
}

proptest! {
    #[test]
    fn token_is_short_lowercase_hex(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let token = content_token(&bytes);
        prop_assert_eq!(token.len(), TOKEN_LEN);
        prop_assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        prop_assert_eq!(token, content_token(&bytes));
    }

    #[test]
    fn fingerprinted_name_keeps_directory_stem_and_extension(
        dir in "[a-z]{1,8}",
        stem in "[a-z][a-z0-9_]{0,12}",
        token in "[0-9a-f]{10}",
    ) {
        let relative = PathBuf::from(format!("{dir}/{stem}.css"));
        let renamed = fingerprinted_path(&relative, &token);

        prop_assert_eq!(renamed.parent(), relative.parent());
        let expected_name = format!("{stem}-{token}.css");
        prop_assert_eq!(
            renamed.file_name().and_then(|n| n.to_str()),
            Some(expected_name.as_str())
        );
    }

    #[test]
    fn different_contents_get_different_tokens(
        a in "[ -~]{1,64}",
        b in "[ -~]{1,64}",
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(content_token(a.as_bytes()), content_token(b.as_bytes()));
    }
}
