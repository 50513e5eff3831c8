use std::fs;

use magsav_scripts::css::{fix_css_dir, fix_css_file};
use tempfile::tempdir;

#[test]
fn rewrites_only_files_that_need_fallbacks() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("themes").join("dark");
    fs::create_dir_all(&nested).unwrap();

    let vendor = nested.join("buttons.css");
    fs::write(&vendor, ".button {\n    -fx-padding: 8 16;\n    -fx-border-radius: 4;\n}\n").unwrap();
    let plain = dir.path().join("plain.css");
    fs::write(&plain, ".title { color: red; }\n").unwrap();
    let ignored = dir.path().join("notes.txt");
    fs::write(&ignored, "-fx-padding: 8 16;").unwrap();

    let report = fix_css_dir(dir.path()).unwrap();

    assert_eq!(report.scanned, 2);
    assert_eq!(report.modified, vec![vendor.clone()]);
    assert!(report.errors.is_empty());

    let fixed = fs::read_to_string(&vendor).unwrap();
    assert!(fixed.contains("padding: 8px 16px; -fx-padding: 8 16;"));
    assert!(fixed.contains("border-radius: 4; -fx-border-radius: 4;"));
    assert_eq!(fs::read_to_string(&plain).unwrap(), ".title { color: red; }\n");
    assert_eq!(fs::read_to_string(&ignored).unwrap(), "-fx-padding: 8 16;");
}

#[test]
fn second_run_leaves_files_untouched() {
    let dir = tempdir().unwrap();
    let sheet = dir.path().join("main.css");
    fs::write(&sheet, ".root { -fx-font-size: 13px; -fx-font-weight: bold; }").unwrap();

    assert!(fix_css_file(&sheet).unwrap());
    let first = fs::read_to_string(&sheet).unwrap();

    assert!(!fix_css_file(&sheet).unwrap());
    assert_eq!(fs::read_to_string(&sheet).unwrap(), first);
}

#[test]
fn unreadable_files_are_reported_and_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.css"), ".a { -fx-opacity: 0.5; }").unwrap();
    fs::write(dir.path().join("b.css"), [0xffu8, 0xfe, 0x00, 0x9f]).unwrap();

    let report = fix_css_dir(dir.path()).unwrap();

    assert_eq!(report.scanned, 2);
    assert_eq!(report.modified.len(), 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].0.ends_with("b.css"));
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(fix_css_dir(&dir.path().join("nope")).is_err());
}
