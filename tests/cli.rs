//! Command-line tests of the `comatrix` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const DOC: &str = r#"{
    "variable": { "nameX": "Color", "nameY": "Size" },
    "dimensions": {
        "x": { "name": "Color", "type": "Categorical",
               "groups": [ { "name": "A", "values": ["red", "pink"] },
                           { "name": "B", "values": ["blue"] } ] },
        "y": { "name": "Size", "type": "Numerical",
               "intervals": [ { "bounds": null }, { "bounds": [0, 1] }, { "bounds": [1, 5] } ] },
        "context": [ { "name": "Class", "type": "Categorical",
                       "groups": [ { "name": "yes" }, { "name": "no" } ] } ]
    },
    "frequencies": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0],
    "minMaxValues": { "HELLINGER": [-1, 1] }
}"#;

fn document(text: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

fn comatrix() -> Command {
    Command::cargo_bin("comatrix").unwrap()
}

#[test]
fn summary_lists_every_mode() {
    let file = document(DOC);
    comatrix()
        .arg(file.path())
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Matrix: Color x Size"))
        .stdout(predicate::str::contains("Context: Class"))
        .stdout(predicate::str::contains("Total: 66"))
        .stdout(predicate::str::contains("MUTUAL_INFO_TARGET_WITH_CELL"))
        .stdout(predicate::str::contains("HELLINGER"));
}

#[test]
fn missing_file_fails() {
    comatrix()
        .arg("/definitely/not/here.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn malformed_document_fails() {
    let file = document(r#"{ "dimensions": "#);
    comatrix()
        .arg(file.path())
        .arg("--summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}

#[test]
fn shape_mismatch_fails() {
    let file = document(&DOC.replace(", 11, 0]", "]"));
    comatrix()
        .arg(file.path())
        .arg("--summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("shape"));
}

#[test]
fn unknown_mode_is_rejected() {
    let file = document(DOC);
    comatrix()
        .arg(file.path())
        .args(["--mode", "ENTROPY", "--summary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ENTROPY"));
}

#[test]
fn help_describes_the_tool() {
    comatrix()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("contingency matrices"))
        .stdout(predicate::str::contains("--frequency-layout"));
}

#[test]
fn log_file_records_loading() {
    let file = document(DOC);
    let log = NamedTempFile::new().unwrap();
    comatrix()
        .arg(file.path())
        .arg("--summary")
        .arg("--log")
        .arg(log.path())
        .assert()
        .success();
    let text = std::fs::read_to_string(log.path()).unwrap();
    assert!(text.contains("Loaded 2 x 3 matrix"));
}
