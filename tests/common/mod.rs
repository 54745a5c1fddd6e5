//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a dlt command isolated from the user's own config
pub fn dlt() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("dlt"));
    cmd.env_remove("DLT_ROLE")
        .env_remove("DLT_LOG")
        .env("DLT_AUTHOR", "tester")
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("dlt-test-no-config"));
    cmd
}

/// dlt running inside the lab at `tmp`
pub fn dlt_in(tmp: &TempDir) -> Command {
    let mut cmd = dlt();
    cmd.current_dir(tmp.path());
    cmd
}

/// dlt running as an admin inside the lab at `tmp`
pub fn dlt_admin(tmp: &TempDir) -> Command {
    let mut cmd = dlt_in(tmp);
    cmd.env("DLT_ROLE", "admin");
    cmd
}

/// Helper to create a lab workspace in a temp directory
pub fn setup_test_lab() -> TempDir {
    let tmp = TempDir::new().unwrap();
    dlt_in(&tmp).arg("init").assert().success();
    tmp
}

/// Helper to create a case and return its ID
pub fn create_test_case(tmp: &TempDir, extra: &[&str]) -> String {
    let mut args = vec![
        "case",
        "new",
        "--doctor",
        "Dr. Lee",
        "--patient",
        "A. Patient",
        "--due",
        "2030-01-15",
        "--format",
        "id",
    ];
    args.extend_from_slice(extra);

    let output = dlt_in(tmp).args(&args).output().unwrap();
    assert!(
        output.status.success(),
        "case new failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A night guard case (removable template)
pub fn create_night_guard(tmp: &TempDir) -> String {
    create_test_case(
        tmp,
        &["--category", "removable", "--sub-type", "night_guard"],
    )
}

/// A layered zirconia crown on natural teeth
pub fn create_zirconia_crown(tmp: &TempDir) -> String {
    create_test_case(
        tmp,
        &["--category", "fixed", "--material", "zirconia_layered"],
    )
}
