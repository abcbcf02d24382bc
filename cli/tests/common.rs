//! # TerminalBot CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Every test runs
//! the compiled `termbot` binary inside its own temporary directory, with the
//! home and config directories redirected there as well, so datastores and
//! configuration files never leak between tests or into the real home.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// The line printed when the chat loop starts with the default bot name.
pub const START_LINE: &str = "Starting TerminalBot. Type your message; use /quit to exit.";

/// An isolated working directory for one test.
pub fn sandbox() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir for test")
}

/// # Get TerminalBot Command (`termbot_cmd`)
///
/// An `assert_cmd::Command` for the compiled `termbot` binary, running in
/// `dir` with `HOME` and `XDG_CONFIG_HOME` pointing into it and logging at
/// the default level.
pub fn termbot_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("termbot").expect("Failed to find termbot binary for testing");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

/// Writes a `.termbot.toml` project config into `dir`.
pub fn write_project_config(dir: &Path, content: &str) {
    fs::write(dir.join(".termbot.toml"), content).expect("Failed to write project config");
}

/// The `bot:` lines of a chat transcript, without the `user: ` prompts.
pub fn bot_lines(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter_map(|line| line.split("bot: ").nth(1))
        .map(str::to_string)
        .collect()
}
