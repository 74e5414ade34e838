//! Integration tests for the top spenders CLI.
//!
//! These tests run the actual binary inside a temporary working directory
//! and check the terminal output and the JSON artifact it writes there.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Absolute path to a test data file
fn test_data_path(filename: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), filename)
}

fn request(extra: &str) -> String {
    format!(
        r#"{{"file_name": "{}"{}}}"#,
        test_data_path("transactions.csv"),
        extra
    )
}

/// Run the binary in `dir` with the given request and return stdout
fn run_ranker(dir: &Path, request: &str) -> String {
    let mut cmd = Command::cargo_bin("top-spenders").unwrap();
    let assert = cmd.current_dir(dir).arg(request).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

/// JSON artifacts written into `dir`
fn artifacts(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            name.starts_with("top_spender.") && name.ends_with(".json")
        })
        .collect()
}

fn artifact_emails(path: &Path) -> Vec<String> {
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["email"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_filtered_top_spenders() {
    let dir = TempDir::new().unwrap();
    let output = run_ranker(
        dir.path(),
        &request(
            r#", "filters": [
                {"field": "description", "cmp": "=", "value": "card spend"},
                {"field": "month", "cmp": "=", "value": "2"}
            ], "top_n": 10"#,
        ),
    );

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "Top spenders:");
    assert_eq!(
        lines[1],
        "Email: ada@example.com, FirstName: Ada, LastName: Lovelace, MerchantCode: M100, TotalSpend: 200.00"
    );
    assert!(lines[2].starts_with("Email: alan@example.com"));
    assert!(lines[3].starts_with("Email: edsger@example.com"));
    assert!(lines[3].ends_with("TotalSpend: 50.00"));

    let files = artifacts(dir.path());
    assert_eq!(files.len(), 1);
    assert_eq!(
        artifact_emails(&files[0]),
        vec!["ada@example.com", "alan@example.com", "edsger@example.com"]
    );

    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(output.contains(&name));
}

#[test]
fn test_unfiltered_ranking_uses_converted_totals() {
    let dir = TempDir::new().unwrap();
    run_ranker(dir.path(), &request(r#", "top_n": 3"#));

    let files = artifacts(dir.path());
    assert_eq!(
        artifact_emails(&files[0]),
        vec!["grace@example.com", "ada@example.com", "ken@example.com"]
    );

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(value[2]["total_spend"], "117.000");
    assert_eq!(value[2]["from_currency"], "GGM");
}

#[test]
fn test_accepts_legacy_top_n_key() {
    let dir = TempDir::new().unwrap();
    let output = run_ranker(dir.path(), &request(r#", "topN": 1"#));
    assert_eq!(output.lines().filter(|l| l.starts_with("Email:")).count(), 1);
    assert!(output.contains("grace@example.com"));
}

#[test]
fn test_no_matches_writes_no_file() {
    let dir = TempDir::new().unwrap();
    let output = run_ranker(
        dir.path(),
        &request(r#", "filters": [{"field": "month", "cmp": ">", "value": "11"}], "top_n": 5"#),
    );

    assert_eq!(output.trim(), "No matching transactions.");
    assert!(artifacts(dir.path()).is_empty());
}

#[test]
fn test_zero_top_n_is_empty() {
    let dir = TempDir::new().unwrap();
    let output = run_ranker(dir.path(), &request(r#", "top_n": 0"#));
    assert_eq!(output.trim(), "No matching transactions.");
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("top-spenders").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing request argument"));
}

#[test]
fn test_malformed_request_error() {
    let mut cmd = Command::cargo_bin("top-spenders").unwrap();
    cmd.arg("{\"file_name\": ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid request"));
}

#[test]
fn test_missing_file_error() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("top-spenders").unwrap();
    cmd.current_dir(dir.path())
        .arg(r#"{"file_name": "nonexistent.csv", "top_n": 3}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
    assert!(artifacts(dir.path()).is_empty());
}

#[test]
fn test_unknown_filter_error_policy() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("top-spenders").unwrap();
    cmd.current_dir(dir.path())
        .arg(request(
            r#", "filters": [{"field": "merchant", "cmp": "=", "value": "M100"}], "top_n": 3, "unknown_filter": "error""#,
        ))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported filter"));
}

#[test]
fn test_strict_mode_reports_bad_row() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("top-spenders").unwrap();
    cmd.current_dir(dir.path())
        .arg(request(r#", "top_n": 3, "strict": true"#))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid transaction at row 8"));
}
