//! # Runtime Bootstrap
//!
//! File: cli/src/core/runtime.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Process-wide settings, configured once before the bot is built. The first
//! call to [`configure`] fixes the settings for the rest of the process; later
//! calls leave them untouched and return what is already there.
//!
//! Configuring also makes sure the runtime datastore exists: its directory is
//! created, the SQLite file is opened (and thereby created), and a
//! `runtime_info` table records the non-secret settings. Nothing else reads
//! this datastore. It is kept apart from the bot's statement datastore.
//!
//! There is no teardown; the settings live until the process exits.
//!
use crate::common::fs::io;
use crate::core::config::RuntimeConfig;
use crate::core::error::{Result, TermbotError};
use anyhow::Context;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// The process-wide runtime settings.
#[derive(Clone, PartialEq)]
pub struct Settings {
    pub debug: bool,
    pub secret_key: String,
    pub time_zone: String,
    pub database: PathBuf,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.secret_key.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("Settings")
            .field("debug", &self.debug)
            .field("secret_key", &secret)
            .field("time_zone", &self.time_zone)
            .field("database", &self.database)
            .finish()
    }
}

impl From<&RuntimeConfig> for Settings {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            debug: config.debug,
            secret_key: config.secret_key.clone(),
            time_zone: config.time_zone.clone(),
            database: config.database.clone(),
        }
    }
}

/// Configures the process-wide settings once and prepares the runtime datastore.
///
/// # Arguments
///
/// * `config` - The `[runtime]` section of the loaded configuration.
///
/// # Returns
///
/// The settings in effect, which are the ones from the first successful call.
///
/// # Errors
///
/// Fails if the datastore directory cannot be created or the SQLite file
/// cannot be opened or written. The settings stay unset in that case.
pub fn configure(config: &RuntimeConfig) -> Result<&'static Settings> {
    if let Some(settings) = SETTINGS.get() {
        debug!("Runtime already configured; keeping {:?}", settings);
        return Ok(settings);
    }

    let settings = Settings::from(config);
    prepare_datastore(&settings)?;
    let settings = SETTINGS.get_or_init(|| settings);
    info!("Runtime configured: {:?}", settings);
    Ok(settings)
}

/// The configured settings, if [`configure`] has succeeded.
pub fn settings() -> Option<&'static Settings> {
    SETTINGS.get()
}

/// Creates the runtime datastore if needed and records the settings in it.
fn prepare_datastore(settings: &Settings) -> Result<()> {
    io::ensure_parent_dir_exists(&settings.database)?;
    let conn = open_datastore(&settings.database)?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS runtime_info (
             key   TEXT PRIMARY KEY,
             value TEXT NOT NULL
         );",
    )
    .map_err(TermbotError::from)?;

    let entries = [
        ("debug", settings.debug.to_string()),
        ("time_zone", settings.time_zone.clone()),
        ("configured_at", Utc::now().to_rfc3339()),
    ];
    for (key, value) in entries {
        conn.execute(
            "INSERT OR REPLACE INTO runtime_info (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .map_err(TermbotError::from)?;
    }
    debug!("Runtime datastore ready at {}", settings.database.display());
    Ok(())
}

fn open_datastore(path: &Path) -> Result<Connection> {
    Connection::open(path)
        .map_err(TermbotError::from)
        .with_context(|| format!("Failed to open runtime datastore {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn runtime_config(database: PathBuf) -> RuntimeConfig {
        RuntimeConfig {
            database,
            ..Default::default()
        }
    }

    fn recorded(path: &Path, key: &str) -> String {
        let conn = Connection::open(path).unwrap();
        conn.query_row(
            "SELECT value FROM runtime_info WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_prepare_datastore_creates_file_and_records_settings() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/db.sqlite3");
        let settings = Settings::from(&runtime_config(path.clone()));

        prepare_datastore(&settings)?;
        assert!(path.is_file());
        assert_eq!(recorded(&path, "time_zone"), "UTC");
        assert_eq!(recorded(&path, "debug"), "true");

        // Preparing an existing datastore again is fine.
        prepare_datastore(&settings)?;
        Ok(())
    }

    #[test]
    fn test_prepare_datastore_fails_on_directory_path() -> Result<()> {
        let dir = tempdir()?;
        let settings = Settings::from(&runtime_config(dir.path().to_path_buf()));
        assert!(prepare_datastore(&settings).is_err());
        Ok(())
    }

    #[test]
    fn test_debug_output_hides_secret() {
        let settings = Settings::from(&RuntimeConfig::default());
        let shown = format!("{:?}", settings);
        assert!(shown.contains("<redacted>"));
        assert!(!shown.contains("dev-not-for-production"));
    }

    // The only test touching the process-wide settings.
    #[test]
    fn test_configure_is_init_once() -> Result<()> {
        // Setup: two configurations pointing at different datastores
        let dir = tempdir()?;
        let first = runtime_config(dir.path().join("first.sqlite3"));
        let mut second = runtime_config(dir.path().join("second.sqlite3"));
        second.time_zone = "Europe/Paris".to_string();

        // Action: configure with the first
        let configured = configure(&first)?;

        // Assert: the accessor sees it
        assert_eq!(settings(), Some(configured));
        assert_eq!(configured.database, first.database);

        // Action & Assert: a second call keeps the first settings
        let again = configure(&second)?;
        assert_eq!(again.time_zone, "UTC");
        assert_eq!(settings().map(|s| &s.database), Some(&first.database));
        assert!(!second.database.exists());
        Ok(())
    }
}
