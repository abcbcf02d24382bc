//! # TerminalBot Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers that are not specific to one part of the client. Currently
//! only filesystem operations, used to prepare datastore directories and read
//! configuration files.
//!

/// Utilities for filesystem operations.
pub mod fs;
