//! # TerminalBot CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Top-level behavior of the `termbot` binary: the standard `--help` and
//! `--version` flags, argument errors, and configuration failures.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_main_help_flag() {
    let dir = sandbox();
    termbot_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--fresh-train"));
}

#[test]
fn test_main_version_flag() {
    let dir = sandbox();
    termbot_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_argument_is_rejected() {
    let dir = sandbox();
    termbot_cmd(dir.path())
        .arg("--verbose")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--verbose"));
    // Nothing is created before arguments are accepted.
    assert!(!dir.path().join("bot_db.sqlite3").exists());
}

#[test]
fn test_invalid_config_exits_with_error() {
    let dir = sandbox();
    write_project_config(dir.path(), "[bot]\nmaximum_similarity_threshold = 2.0\n");
    termbot_cmd(dir.path())
        .write_stdin("/quit\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Initializing bot…"))
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("maximum_similarity_threshold"));
}

#[test]
fn test_malformed_config_exits_with_error() {
    let dir = sandbox();
    write_project_config(dir.path(), "[bot]\nname = \n");
    termbot_cmd(dir.path())
        .write_stdin("/quit\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse TOML"));
}
