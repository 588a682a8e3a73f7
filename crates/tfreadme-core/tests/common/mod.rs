//! Common test utilities.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Get the path to the test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// README of a fixture module.
pub fn fixture_readme(module: &str) -> PathBuf {
    fixtures_dir().join(module).join("README.md")
}

/// Copy a fixture module into a temporary directory so tests can modify it.
pub fn copy_fixture(module: &str) -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    copy_dir(&fixtures_dir().join(module), temp.path());
    temp
}

fn copy_dir(from: &Path, to: &Path) {
    for entry in std::fs::read_dir(from).expect("Failed to read fixture dir") {
        let entry = entry.expect("Failed to read fixture entry");
        let target = to.join(entry.file_name());
        if entry.path().is_dir() {
            std::fs::create_dir_all(&target).expect("Failed to create dir");
            copy_dir(&entry.path(), &target);
        } else {
            std::fs::copy(entry.path(), &target).expect("Failed to copy fixture file");
        }
    }
}
