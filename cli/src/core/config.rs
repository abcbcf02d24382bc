//! # TerminalBot Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements the configuration system for TerminalBot, handling
//! loading, merging, validation, and access to configuration data. Running
//! `termbot` without any configuration file behaves exactly like the defaults
//! below; files only override individual values.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.termbot.toml` in current directory or ancestors
//! 2. User-specific `~/.config/termbot/config.toml`
//! 3. Default values defined in the code
//!
//! The configuration has three sections:
//! - `[bot]`: the dialog agent (name, datastore, logic adapters)
//! - `[runtime]`: process-wide settings and the runtime datastore
//! - `[training]`: corpora used by `--fresh-train`
//!
//! Each file is read into a `ConfigFile` whose values are all optional, so a
//! key set in the project file overrides the user file even when it repeats
//! the default.
//!
//! Datastore paths are expanded (`~` to the home directory) and relative
//! paths are resolved against the current directory.
//!
//! ## Examples
//!
//! ```toml
//! [bot]
//! name = "TerminalBot"
//! database = "~/.local/share/termbot/bot_db.sqlite3"
//! logic_adapters = ["best_match", "time", "math"]
//!
//! [training]
//! corpora = ["english.greetings"]
//! ```
//!
use crate::common::fs::io;
use crate::core::error::{Result, TermbotError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use termbot_dialog::logic::best_match::DEFAULT_MAXIMUM_SIMILARITY_THRESHOLD;
use termbot_dialog::LogicAdapterKind;
use tracing::{debug, info, warn};

/// The merged configuration every other module reads.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    pub bot: BotConfig,
    pub runtime: RuntimeConfig,
    pub training: TrainingConfig,
}

/// Configuration of the dialog agent.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Display name, also used in the bot persona.
    pub name: String,
    /// Statement datastore (can use ~). Will be expanded.
    pub database: PathBuf,
    /// Answer without learning from the conversation.
    pub read_only: bool,
    /// Logic adapters, consulted in this order.
    pub logic_adapters: Vec<LogicAdapterKind>,
    /// Similarity at which best-match search stops looking.
    pub maximum_similarity_threshold: f64,
    /// Reply used when nothing learned matches the input.
    pub default_response: Option<String>,
}

/// Process-wide runtime settings, see [`crate::core::runtime`].
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Runtime datastore (can use ~). Will be expanded.
    pub database: PathBuf,
    pub debug: bool,
    pub secret_key: String,
    pub time_zone: String,
}

/// Corpora loaded by the training routine.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub corpora: Vec<String>,
}

/// One configuration file as written. A `None` field was not set in the file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    bot: BotFile,
    runtime: RuntimeFile,
    training: TrainingFile,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct BotFile {
    name: Option<String>,
    database: Option<PathBuf>,
    read_only: Option<bool>,
    logic_adapters: Option<Vec<LogicAdapterKind>>,
    maximum_similarity_threshold: Option<f64>,
    default_response: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct RuntimeFile {
    database: Option<PathBuf>,
    debug: Option<bool>,
    secret_key: Option<String>,
    time_zone: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct TrainingFile {
    corpora: Option<Vec<String>>,
}

impl ConfigFile {
    /// Layers `project` over `self`: every value the project file sets wins.
    fn overlay(self, project: ConfigFile) -> ConfigFile {
        ConfigFile {
            bot: BotFile {
                name: project.bot.name.or(self.bot.name),
                database: project.bot.database.or(self.bot.database),
                read_only: project.bot.read_only.or(self.bot.read_only),
                logic_adapters: project.bot.logic_adapters.or(self.bot.logic_adapters),
                maximum_similarity_threshold: project
                    .bot
                    .maximum_similarity_threshold
                    .or(self.bot.maximum_similarity_threshold),
                default_response: project.bot.default_response.or(self.bot.default_response),
            },
            runtime: RuntimeFile {
                database: project.runtime.database.or(self.runtime.database),
                debug: project.runtime.debug.or(self.runtime.debug),
                secret_key: project.runtime.secret_key.or(self.runtime.secret_key),
                time_zone: project.runtime.time_zone.or(self.runtime.time_zone),
            },
            training: TrainingFile {
                corpora: project.training.corpora.or(self.training.corpora),
            },
        }
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Self {
            bot: BotConfig {
                name: file.bot.name.unwrap_or_else(default_bot_name),
                database: file.bot.database.unwrap_or_else(default_bot_database),
                read_only: file.bot.read_only.unwrap_or(false),
                logic_adapters: file
                    .bot
                    .logic_adapters
                    .unwrap_or_else(LogicAdapterKind::defaults),
                maximum_similarity_threshold: file
                    .bot
                    .maximum_similarity_threshold
                    .unwrap_or_else(default_similarity_threshold),
                default_response: file.bot.default_response,
            },
            runtime: RuntimeConfig {
                database: file.runtime.database.unwrap_or_else(default_runtime_database),
                debug: file.runtime.debug.unwrap_or_else(default_debug),
                secret_key: file.runtime.secret_key.unwrap_or_else(default_secret_key),
                time_zone: file.runtime.time_zone.unwrap_or_else(default_time_zone),
            },
            training: TrainingConfig {
                corpora: file.training.corpora.unwrap_or_else(default_corpora),
            },
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            database: default_bot_database(),
            read_only: false,
            logic_adapters: LogicAdapterKind::defaults(),
            maximum_similarity_threshold: default_similarity_threshold(),
            default_response: None,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            database: default_runtime_database(),
            debug: default_debug(),
            secret_key: default_secret_key(),
            time_zone: default_time_zone(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            corpora: default_corpora(),
        }
    }
}

fn default_bot_name() -> String {
    "TerminalBot".to_string()
}
fn default_bot_database() -> PathBuf {
    PathBuf::from("bot_db.sqlite3")
}
fn default_similarity_threshold() -> f64 {
    DEFAULT_MAXIMUM_SIMILARITY_THRESHOLD
}
fn default_runtime_database() -> PathBuf {
    PathBuf::from("db.sqlite3")
}
fn default_debug() -> bool {
    true
}
fn default_secret_key() -> String {
    "dev-not-for-production".to_string()
}
fn default_time_zone() -> String {
    "UTC".to_string()
}
fn default_corpora() -> Vec<String> {
    vec![
        "english.greetings".to_string(),
        "english.conversations".to_string(),
    ]
}

const PROJECT_CONFIG_FILENAME: &str = ".termbot.toml";

/// Loads, merges, expands and validates the configuration.
///
/// # Returns
///
/// The configuration in effect: defaults, overridden by the user file,
/// overridden by the nearest project `.termbot.toml`. Datastore paths are
/// absolute.
///
/// # Errors
///
/// Returns an error if a configuration file exists but cannot be read or
/// parsed (unknown keys included), or if the merged values are invalid.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    let base = std::env::current_dir().context("Failed to get current directory")?;
    expand_config_paths(&mut merged_config, &base)
        .context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "TerminalBot", "termbot") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.termbot.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Finds the project configuration file for `start`.
///
/// # Arguments
///
/// * `start` - Directory to search from, usually the current directory.
///
/// # Returns
///
/// The first `.termbot.toml` in `start` or its ancestors. `None` if there is
/// none, or if a directory containing `.git` is reached first.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    for path in start.ancestors() {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
    }
    None
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = io::read_file_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Merges the user file with the optional project file and fills in defaults.
///
/// # Arguments
///
/// * `user` - The user file, or an empty one if there is none.
/// * `project` - The project file, if one was found.
///
/// # Returns
///
/// A complete configuration. A value set in the project file always wins,
/// even when it equals the default; otherwise the user value is used, then
/// the default.
fn merge_configs(user: ConfigFile, project: Option<ConfigFile>) -> Config {
    let merged = match project {
        Some(project) => user.overlay(project),
        None => user,
    };
    Config::from(merged)
}

/// Expands `~` and anchors relative datastore paths at `base`.
///
/// # Arguments
///
/// * `config` - The configuration to update in place.
/// * `base` - Directory relative paths are resolved against.
fn expand_config_paths(config: &mut Config, base: &Path) -> Result<()> {
    debug!("Expanding paths in configuration...");
    config.bot.database = expand_path(&config.bot.database, base);
    config.runtime.database = expand_path(&config.runtime.database, base);
    debug!(
        "Expanded datastores: bot={}, runtime={}",
        config.bot.database.display(),
        config.runtime.database.display()
    );
    Ok(())
}

fn expand_path(path: &Path, base: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// Checks values that parse but cannot work.
///
/// # Errors
///
/// Returns a `TermbotError::Config` naming the first problem: an empty bot
/// name, a similarity threshold outside `(0, 1]`, no logic adapters, one file
/// shared by both datastores, no corpora, or an empty time zone.
fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.bot.name.trim().is_empty() {
        return Err(anyhow!(TermbotError::Config(
            "Bot name cannot be empty.".to_string()
        )));
    }
    let threshold = config.bot.maximum_similarity_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(anyhow!(TermbotError::Config(format!(
            "maximum_similarity_threshold must be in (0, 1], got {}.",
            threshold
        ))));
    }
    if config.bot.logic_adapters.is_empty() {
        return Err(anyhow!(TermbotError::Config(
            "At least one logic adapter must be configured.".to_string()
        )));
    }
    if config.bot.database == config.runtime.database {
        return Err(anyhow!(TermbotError::Config(format!(
            "The bot and runtime datastores must be different files (both are '{}').",
            config.bot.database.display()
        ))));
    }
    if config.training.corpora.is_empty() {
        return Err(anyhow!(TermbotError::Config(
            "At least one training corpus must be configured.".to_string()
        )));
    }
    if config.runtime.time_zone.trim().is_empty() {
        return Err(anyhow!(TermbotError::Config(
            "Runtime time_zone cannot be empty.".to_string()
        )));
    }
    info!("Configuration validation successful.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn parse(toml_content: &str) -> ConfigFile {
        toml::from_str(toml_content).expect("Failed to parse TOML")
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = Config::from(parse(""));
        assert_eq!(config, Config::default());
        assert_eq!(config.bot.name, "TerminalBot");
        assert_eq!(config.bot.database, PathBuf::from("bot_db.sqlite3"));
        assert_eq!(config.runtime.database, PathBuf::from("db.sqlite3"));
        assert_eq!(config.runtime.time_zone, "UTC");
        assert!(config.runtime.debug);
        assert_eq!(
            config.training.corpora,
            vec!["english.greetings", "english.conversations"]
        );
    }

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [bot]
            name = "Marvin"
            database = "~/bots/marvin.sqlite3"
            logic_adapters = ["math", "best_match"]
            default_response = "I have no idea."

            [training]
            corpora = ["english.greetings"]
        "#;

        let config = Config::from(parse(toml_content));

        assert_eq!(config.bot.name, "Marvin");
        assert_eq!(config.bot.database, PathBuf::from("~/bots/marvin.sqlite3")); // Not yet expanded
        assert_eq!(
            config.bot.logic_adapters,
            vec![LogicAdapterKind::Math, LogicAdapterKind::BestMatch]
        );
        assert_eq!(config.bot.default_response.as_deref(), Some("I have no idea."));
        assert_eq!(config.bot.maximum_similarity_threshold, 0.95); // Default
        assert_eq!(config.training.corpora, vec!["english.greetings"]);
        assert_eq!(config.runtime, RuntimeConfig::default());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(toml::from_str::<ConfigFile>("[bot]\nnmae = \"typo\"").is_err());
        assert!(toml::from_str::<ConfigFile>("[bot]\nlogic_adapters = [\"weather\"]").is_err());
        assert!(toml::from_str::<ConfigFile>("[server]\nport = 1").is_err());
    }

    #[test]
    fn test_merge_prefers_project_values() {
        // Setup
        let user = parse(
            r#"
            [bot]
            name = "UserBot"
            default_response = "user default"
            [runtime]
            time_zone = "Europe/Paris"
        "#,
        );
        let project = parse(
            r#"
            [bot]
            database = "project.sqlite3"
            read_only = true
            [training]
            corpora = ["english.conversations"]
        "#,
        );

        // Action
        let merged = merge_configs(user, Some(project));

        // Assert: project keys win, user keys fill the rest
        assert_eq!(merged.bot.name, "UserBot");
        assert_eq!(merged.bot.database, PathBuf::from("project.sqlite3"));
        assert!(merged.bot.read_only);
        assert_eq!(merged.bot.default_response.as_deref(), Some("user default"));
        assert_eq!(merged.runtime.time_zone, "Europe/Paris");
        assert_eq!(merged.training.corpora, vec!["english.conversations"]);
    }

    #[test]
    fn test_project_values_equal_to_defaults_still_override_user() {
        // Setup: the user changes defaults, the project sets them back
        let user = parse(
            r#"
            [bot]
            name = "UserBot"
            read_only = true
            maximum_similarity_threshold = 0.5
            [runtime]
            debug = false
        "#,
        );
        let project = parse(
            r#"
            [bot]
            name = "TerminalBot"
            read_only = false
            maximum_similarity_threshold = 0.95
            [runtime]
            debug = true
        "#,
        );

        // Action
        let merged = merge_configs(user, Some(project));

        // Assert
        assert_eq!(merged.bot.name, "TerminalBot");
        assert!(!merged.bot.read_only);
        assert_eq!(merged.bot.maximum_similarity_threshold, 0.95);
        assert!(merged.runtime.debug);
    }

    #[test]
    fn test_merge_without_project_keeps_user_values() {
        let user = parse("[bot]\nread_only = true\n[runtime]\ndebug = false");
        let merged = merge_configs(user, None);
        assert!(merged.bot.read_only);
        assert!(!merged.runtime.debug);
        assert_eq!(merged.bot.name, "TerminalBot");
    }

    #[test]
    fn test_path_expansion() {
        // Setup
        let base = tempdir().unwrap();
        let mut config = Config::default();
        config.bot.database = PathBuf::from("~/bot_test.sqlite3");
        config.runtime.database = PathBuf::from("/absolute/db.sqlite3");

        // Action
        expand_config_paths(&mut config, base.path()).unwrap();

        // Assert
        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(config.bot.database, home_dir.join("bot_test.sqlite3"));
        assert_eq!(config.runtime.database, PathBuf::from("/absolute/db.sqlite3")); // Absolute path unchanged

        let mut relative = Config::default();
        expand_config_paths(&mut relative, base.path()).unwrap();
        assert_eq!(relative.bot.database, base.path().join("bot_db.sqlite3"));
        assert_eq!(relative.runtime.database, base.path().join("db.sqlite3"));
    }

    #[test]
    fn test_validate_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_config_rejects_bad_values() {
        let mut config = Config::default();
        config.bot.name = "  ".to_string();
        assert!(validate_config(&config)
            .unwrap_err()
            .to_string()
            .contains("Bot name cannot be empty"));

        let mut config = Config::default();
        config.bot.maximum_similarity_threshold = 1.5;
        assert!(validate_config(&config)
            .unwrap_err()
            .to_string()
            .contains("maximum_similarity_threshold"));

        let mut config = Config::default();
        config.bot.logic_adapters.clear();
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.training.corpora.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_rejects_shared_datastore() {
        // Setup: both datastores point at the same file
        let mut config = Config::default();
        config.runtime.database = config.bot.database.clone();

        // Action & Assert
        assert!(validate_config(&config)
            .unwrap_err()
            .to_string()
            .contains("must be different files"));
    }

    #[test]
    fn test_find_project_config_walks_up_to_git_root() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(root.path().join(".git")).unwrap();

        assert_eq!(find_project_config_path(&nested), None);

        let config_path = root.path().join("a").join(PROJECT_CONFIG_FILENAME);
        fs::write(&config_path, "[bot]\nname = \"Nested\"\n").unwrap();
        assert_eq!(find_project_config_path(&nested), Some(config_path.clone()));
        assert_eq!(
            load_config_from_path(&config_path).unwrap().bot.name.as_deref(),
            Some("Nested")
        );
    }
}
