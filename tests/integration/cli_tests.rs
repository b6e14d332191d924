//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn depadvisor() -> Command {
    Command::cargo_bin("depadvisor").expect("binary builds")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    depadvisor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("depadvisor"))
        .stdout(predicate::str::contains("--graph-dot"))
        .stdout(predicate::str::contains("--strict-runtime-only"))
        .stdout(predicate::str::contains("--reason"));
}

#[test]
fn test_cli_version() {
    depadvisor()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    depadvisor()
        .arg(dir.path())
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("artifacts.json"));
}

// ============================================================================
// Output Format Tests
// ============================================================================

#[test]
fn test_cli_terminal_output() {
    depadvisor()
        .arg(fixtures_path().join("app"))
        .arg("--quiet")
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unused dependencies which should be removed"))
        .stdout(predicate::str::contains("implementation(\"lib:unused:1.0\")"))
        .stdout(predicate::str::contains("api(\"lib:foo:1.0\") (was implementation)"))
        .stdout(predicate::str::contains("kapt(\"com.google.dagger:dagger-compiler:2.50\")"));
}

#[test]
fn test_cli_json_output() {
    let output = depadvisor()
        .arg(fixtures_path().join("app"))
        .args(["--format", "json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["total"], 5);
    assert_eq!(json["summary"]["processors"], 1);
    assert_eq!(json["summary"]["downgrades"], 1);
    assert_eq!(json["advice"]["dependency_advice"].as_array().unwrap().len(), 4);
}

#[test]
fn test_cli_json_to_file() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("advice.json");

    depadvisor()
        .arg(fixtures_path().join("app"))
        .args(["--format", "json", "--quiet", "--output"])
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["summary"]["add"], 1);
}

// ============================================================================
// Option Tests
// ============================================================================

#[test]
fn test_cli_strict_runtime_only_flag() {
    let output = depadvisor()
        .arg(fixtures_path().join("app"))
        .args(["--format", "json", "--quiet", "--strict-runtime-only"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("runtimeOnly"));
}

#[test]
fn test_cli_variant_filter_and_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("depadvisor.toml");
    std::fs::write(&config, "ignore = [\"lib:baz\"]\n\n[report]\nformat = \"json\"\n").unwrap();

    let output = depadvisor()
        .arg(fixtures_path().join("app"))
        .arg("--config")
        .arg(&config)
        .args(["--variant", "release", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let advice = json["advice"]["dependency_advice"].as_array().unwrap();
    assert_eq!(advice.len(), 2);
    assert!(!String::from_utf8_lossy(&output.stdout).contains("lib:baz"));
}

#[test]
fn test_cli_graph_dot() {
    let dir = TempDir::new().unwrap();

    depadvisor()
        .arg(fixtures_path().join("app"))
        .arg("--quiet")
        .arg("--graph-dot")
        .arg(dir.path())
        .assert()
        .success();

    for variant in ["debug", "release"] {
        let dot = std::fs::read_to_string(dir.path().join(format!("{}.gv", variant))).unwrap();
        assert!(dot.starts_with(&format!("strict digraph \"{}\"", variant)));
        assert!(dot.contains("\"lib:foo:1.0\" -> \"lib:trans:1.2\";"));
    }
}

#[test]
fn test_cli_reason() {
    depadvisor()
        .arg(fixtures_path().join("app"))
        .args(["--quiet", "--reason", "lib:bar"])
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reason for lib:bar:2.0"))
        .stdout(predicate::str::contains("[debug] used as runtimeOnly"))
        .stdout(predicate::str::contains("Evidence: SERVICE_LOADER"))
        .stdout(predicate::str::contains("Required by: :app"))
        .stdout(predicate::str::contains("Advice: none"));
}

#[test]
fn test_cli_reason_unknown_dependency() {
    depadvisor()
        .arg(fixtures_path().join("app"))
        .args(["--quiet", "--reason", "lib:missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lib:missing"));
}
