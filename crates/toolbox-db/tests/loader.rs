use std::path::PathBuf;

use toolbox_db::{LoadMode, ToolboxError, ToolboxFile, load_entries};
use toolbox_types::FieldTag;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample.toolbox")
}

#[test]
fn parses_fixture_records_with_line_numbers() {
    let file = ToolboxFile::load(fixture()).expect("load fixture");
    let records = file.records().expect("parse records");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].line, 3);
    assert_eq!(records[1].line, 11);
    assert_eq!(records[2].line, 20);
    assert_eq!(records[1].fields[5].tag, "\\glp");
    assert_eq!(records[1].fields[5].value, "cat - wild cat");
}

#[test]
fn builds_entries_from_fixture() {
    let file = ToolboxFile::load(fixture()).expect("load fixture");
    let built = file.entries().expect("build entries");
    assert!(built.warnings.is_empty());
    assert_eq!(built.entries.len(), 3);

    let minos = &built.entries[1];
    assert_eq!(minos.headword(), "minôs");
    assert_eq!(minos.canonical_subsenses(), vec!["cat", "wild cat"]);
    assert_eq!(minos.glosses.len(), 2);
    assert_eq!(minos.glosses[0].segments(), &["cat".to_string()]);
    assert_eq!(minos.glosses[1].segments(), &["cat".to_string(), "wild cat".to_string()]);
    assert_eq!(minos.extra["\\wn"], vec!["cat.n.01"]);
    assert_eq!(minos.extra["\\rw2"], vec!["felis"]);

    let nipaw = &built.entries[2];
    assert_eq!(nipaw.stem, "nipâ-");
    assert_eq!(nipaw.pos.as_ref().map(|p| p.main.as_str()), Some("VAI"));
}

#[test]
fn mmap_and_owned_agree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copy.toolbox");
    std::fs::copy(fixture(), &path).unwrap();

    let mapped = ToolboxFile::load_with_mode(&path, LoadMode::Mmap).expect("mmap");
    let owned = ToolboxFile::load_with_mode(&path, LoadMode::Owned).expect("owned");
    assert_eq!(mapped.text(), owned.text());
    assert_eq!(mapped.records().unwrap(), owned.records().unwrap());
    assert_eq!(mapped.path(), path.as_path());
}

#[test]
fn rejects_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toolbox");
    std::fs::write(&path, b"\\_sh v3.0\n\n\\sro \xff\xfe\n").unwrap();
    assert!(ToolboxFile::load(&path).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ToolboxFile::load(dir.path().join("absent.toolbox")).is_err());
}

#[test]
fn split_entry_surfaces_missing_headword() {
    // A stray blank line cut the second half of this entry loose.
    let text = "\\_sh v3.0\n\n\\sro atim\n\\ps NA-3\n\n\\def dog\n\\gl dog\n";
    let err = load_entries(text).unwrap_err();
    assert!(matches!(
        err,
        ToolboxError::MissingRequiredField {
            line: 6,
            field: FieldTag::Headword,
            ..
        }
    ));
    assert_eq!(err.partial_record(), Some("\\def dog\n\\gl dog"));
}

#[test]
fn blank_stem_falls_back_to_headword() {
    let text = "\\_sh v3.0  400  MDF 4.0\n\n\\sro atim\n\\stm \n\\gl \n\\def dog\n";
    let built = load_entries(text).expect("empty values parse");
    let atim = &built.entries[0];
    assert_eq!(atim.stems, vec![String::new()]);
    assert_eq!(atim.stem, "atim");
    assert!(atim.glosses.is_empty());
}
