//! # TerminalBot Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Small wrappers around `std::fs` used when preparing the datastores and
//! reading configuration files:
//! - **`ensure_dir_exists`**: creates a directory (and its parents) if missing,
//!   and fails if the path exists but is not a directory.
//! - **`ensure_parent_dir_exists`**: the same for the directory a file will be
//!   created in. Both SQLite datastores are opened through this.
//! - **`read_file_to_string`**: `fs::read_to_string` with the path in the error.
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! io::ensure_parent_dir_exists(Path::new("./data/bot_db.sqlite3"))?;
//! let content = io::read_file_to_string(Path::new(".termbot.toml"))?;
//! ```
//!
use crate::core::error::{Result, TermbotError};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(TermbotError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Ensures the parent directory of `file` exists, so the file can be created.
pub fn ensure_parent_dir_exists(file: &Path) -> Result<()> {
    match file.parent() {
        // A bare file name has an empty parent: the current directory.
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_exists(parent),
        _ => Ok(()),
    }
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Test `ensure_dir_exists` when the directory needs to be created, including parents.
    #[test]
    fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("new/subdir");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir)?;
        assert!(new_dir.is_dir());
        Ok(())
    }

    #[test]
    fn test_ensure_dir_exists_already_exists() -> Result<()> {
        let base_dir = tempdir()?;
        let existing_dir = base_dir.path().join("existing");
        fs::create_dir(&existing_dir)?;
        ensure_dir_exists(&existing_dir)?; // Should be a no-op and succeed.
        assert!(existing_dir.is_dir());
        Ok(())
    }

    /// The target path exists but is a file.
    #[test]
    fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello")?;
        let result = ensure_dir_exists(&file_path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Path exists but is not a directory"));
        Ok(())
    }

    #[test]
    fn test_ensure_parent_dir_exists() -> Result<()> {
        let base_dir = tempdir()?;
        let datastore = base_dir.path().join("data/bots/bot_db.sqlite3");
        ensure_parent_dir_exists(&datastore)?;
        assert!(base_dir.path().join("data/bots").is_dir());
        assert!(!datastore.exists());

        // Bare file names live in the current directory; nothing to create.
        ensure_parent_dir_exists(Path::new("bot_db.sqlite3"))?;
        Ok(())
    }

    #[test]
    fn test_read_file_to_string() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("config.toml");
        fs::write(&file_path, "[bot]\nname = \"Marvin\"\n")?;
        assert_eq!(read_file_to_string(&file_path)?, "[bot]\nname = \"Marvin\"\n");

        let missing = read_file_to_string(&base_dir.path().join("nonexistent.toml"));
        assert!(missing.is_err());
        Ok(())
    }
}
