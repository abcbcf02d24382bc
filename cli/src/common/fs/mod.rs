//! # TerminalBot Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!
//! Functions are imported from their submodule, e.g.
//! `crate::common::fs::io::ensure_parent_dir_exists`.
//!

/// Directory creation and file reading with contextual errors.
pub mod io;
