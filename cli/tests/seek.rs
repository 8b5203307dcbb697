use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};
use test_utils::junit_fixture::{mock_report, write_report, MockOutcome, MockTestCase};

const BIN: &str = "testlink-results";

fn write_catalog(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"[
            { "id": 1, "name": "adds", "custom_fields": [{ "name": "key", "value": "calc.MathTest.adds" }] },
            { "id": 2, "name": "divides", "custom_fields": [{ "name": "key", "value": "calc.MathTest.divides" }] },
            { "id": 3, "name": "whole suite", "custom_fields": [{ "name": "key", "value": "calc.MathTest" }] },
            { "id": 4, "name": "never ran", "custom_fields": [{ "name": "key", "value": "calc.Missing.test" }] }
        ]"#,
    )
    .unwrap();
    path
}

fn write_reports(dir: &TempDir) {
    let reports = dir.path().join("reports");
    fs::create_dir(&reports).unwrap();
    write_report(
        &reports,
        "TEST-calc.MathTest.xml",
        &mock_report(
            "calc.MathTest",
            &[
                MockTestCase::new("calc.MathTest", "adds", MockOutcome::Passed),
                MockTestCase::new("calc.MathTest", "divides", MockOutcome::failed("by zero")),
            ],
        ),
    );
}

fn seek_command(dir: &TempDir, key_custom_field: &str) -> Command {
    let catalog = write_catalog(dir);
    write_reports(dir);
    let mut command = Command::cargo_bin(BIN).unwrap();
    command
        .env_remove("TESTLINK_INCLUDES")
        .env_remove("TESTLINK_LOG")
        .arg("seek")
        .arg("--root")
        .arg(dir.path().join("reports"))
        .arg("--catalog")
        .arg(catalog)
        .args(["--key-custom-field", key_custom_field, "--includes", "TEST-*.xml"]);
    command
}

#[test]
fn seek_prints_results_by_test_case() {
    let temp_dir = tempdir().unwrap();

    let assert = seek_command(&temp_dir, "key")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "2 test case(s) matched: 1 passed, 1 failed, 0 blocked, 0 not run",
        ));

    let results: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let results = results.as_object().unwrap();
    assert_eq!(
        results.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["1", "2"]
    );
    assert_eq!(results["1"]["execution_status"], "PASSED");
    assert_eq!(results["2"]["execution_status"], "FAILED");
    assert!(results["2"]["notes"].as_str().unwrap().contains("by zero"));
    assert_eq!(
        results["2"]["attachments"][0]["file_name"],
        "TEST-calc.MathTest.xml"
    );
}

#[test]
fn seek_by_suites_matches_suite_names() {
    let temp_dir = tempdir().unwrap();

    let assert = seek_command(&temp_dir, "key")
        .args(["--by", "suites"])
        .assert()
        .success();

    let results: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let results = results.as_object().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results["3"]["execution_status"], "FAILED");
    assert!(results["3"]["notes"]
        .as_str()
        .unwrap()
        .starts_with("Test suite: calc.MathTest"));
}

#[test]
fn seek_by_class_name_key() {
    let temp_dir = tempdir().unwrap();

    let assert = seek_command(&temp_dir, "key")
        .args(["--key", "class-name"])
        .assert()
        .success();

    let results: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(results["3"]["execution_status"], "FAILED");
    assert_eq!(results["3"]["records"].as_array().unwrap().len(), 2);
}

#[test]
fn seek_writes_output_file() {
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("results.json");

    seek_command(&temp_dir, "key")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let results: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(results["1"]["execution_status"], "PASSED");
}

#[test]
fn seek_reads_settings_from_env() {
    let temp_dir = tempdir().unwrap();
    let catalog = write_catalog(&temp_dir);
    write_reports(&temp_dir);

    Command::cargo_bin(BIN)
        .unwrap()
        .env("TESTLINK_RESULTS_ROOT", temp_dir.path().join("reports"))
        .env("TESTLINK_CATALOG", &catalog)
        .env("TESTLINK_KEY_CUSTOM_FIELD", "key")
        .env("TESTLINK_INCLUDES", "**/TEST-*.xml")
        .arg("seek")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"execution_status\": \"FAILED\""));
}

#[test]
fn seek_missing_root_fails() {
    let temp_dir = tempdir().unwrap();
    let catalog = write_catalog(&temp_dir);

    Command::cargo_bin(BIN)
        .unwrap()
        .arg("seek")
        .arg("--root")
        .arg(temp_dir.path().join("nowhere"))
        .arg("--catalog")
        .arg(catalog)
        .args(["--key-custom-field", "key"])
        .assert()
        .code(exitcode::SOFTWARE)
        .stderr(predicate::str::contains("Failed to seek test results"));
}

#[test]
fn seek_blank_key_field_is_usage_error() {
    let temp_dir = tempdir().unwrap();

    seek_command(&temp_dir, " ")
        .assert()
        .code(exitcode::USAGE)
        .stderr(predicate::str::contains("key custom field name is required"));
}

#[test]
fn seek_requires_catalog() {
    let temp_dir = tempdir().unwrap();

    Command::cargo_bin(BIN)
        .unwrap()
        .env_remove("TESTLINK_CATALOG")
        .arg("seek")
        .arg("--root")
        .arg(temp_dir.path())
        .args(["--key-custom-field", "key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--catalog <CATALOG>"));
}
