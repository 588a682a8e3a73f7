//! Integration tests for the tfreadme binary.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture_readme(module: &str) -> PathBuf {
    PathBuf::from(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../tfreadme-core/tests/fixtures"
    ))
    .join(module)
    .join("README.md")
}

fn tfreadme(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tfreadme"))
        .args(args)
        .args(["--provider-prefix", "azurerm_", "--skip-urls"])
        .env_remove("README_PATH")
        .env_remove("MODULE_PATH")
        .env_remove("FORMAT")
        .env_remove("PROVIDER_PREFIXES")
        .env_remove("VERBOSE")
        .output()
        .expect("Failed to run tfreadme")
}

#[test]
fn test_clean_module_exits_zero() {
    let readme = fixture_readme("table_module");
    let output = tfreadme(&["--readme", readme.to_str().unwrap()]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stdout: {stdout}\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("No issues found"));
    assert!(stdout.contains("table"));
}

#[test]
fn test_findings_exit_one() {
    let readme = fixture_readme("typo_module");
    let output = tfreadme(&["--readme", readme.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("section 'Resourses' appears to be misspelled"));
    assert!(stdout.contains("1 issue found"));
}

#[test]
fn test_json_output() {
    let readme = fixture_readme("typo_module");
    let output = tfreadme(&["--readme", readme.to_str().unwrap(), "--output", "json"]);

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["format"], "document");
    assert_eq!(report["errors"][0]["kind"], "misspelled-section");
}

#[test]
fn test_readme_from_environment() {
    let readme = fixture_readme("heading_module");
    let output = Command::new(env!("CARGO_BIN_EXE_tfreadme"))
        .args(["--skip-urls"])
        .env("README_PATH", &readme)
        .env("PROVIDER_PREFIXES", "azurerm_")
        .env_remove("MODULE_PATH")
        .env_remove("FORMAT")
        .env_remove("VERBOSE")
        .output()
        .expect("Failed to run tfreadme");

    assert!(
        output.status.success(),
        "stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
}

#[test]
fn test_missing_readme_exits_two() {
    let temp = tempfile::tempdir().unwrap();
    let readme = temp.path().join("README.md");
    let output = tfreadme(&["--readme", readme.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "stderr: {stderr}");
}

#[test]
fn test_fail_fast_reports_one_finding() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("README.md"), "# empty\n").unwrap();
    let readme = temp.path().join("README.md");

    let output = tfreadme(&["--readme", readme.to_str().unwrap(), "--fail-fast"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 issue found"), "stdout: {stdout}");
}
