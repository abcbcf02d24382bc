//! # Agent Factory
//!
//! File: cli/src/core/bot.rs
//! Author: Christi Mahu
//!
//! Builds the dialog agent from configuration: a name, the statement
//! datastore, and the configured logic adapters in order. With the default
//! configuration that is `TerminalBot`, `bot_db.sqlite3` in the current
//! directory, and best match, time of day, mathematical evaluation.
//!
use crate::common::fs::io;
use crate::core::config::{BotConfig, Config};
use crate::core::error::{Result, TermbotError};
use anyhow::Context;
use termbot_dialog::{
    BestMatch, ChatBot, LogicAdapter, LogicAdapterKind, MathematicalEvaluation, SqlStorage,
    TimeLogicAdapter,
};
use tracing::info;

/// Opens the statement datastore and assembles the bot.
///
/// # Arguments
///
/// * `config` - The merged configuration; only `[bot]` is read.
///
/// # Returns
///
/// A bot with the configured adapters, in order, over the datastore at
/// `bot.database`. The datastore directory is created if missing.
///
/// # Errors
///
/// Fails if the datastore cannot be created or opened, or if no adapter is
/// configured.
pub fn build_bot(config: &Config) -> Result<ChatBot> {
    let bot_config = &config.bot;
    io::ensure_parent_dir_exists(&bot_config.database)?;
    let storage = SqlStorage::open(&bot_config.database)
        .map_err(TermbotError::from)
        .with_context(|| {
            format!(
                "Failed to open bot datastore {}",
                bot_config.database.display()
            )
        })?;

    let builder = bot_config.logic_adapters.iter().fold(
        ChatBot::builder(bot_config.name.as_str())
            .storage(storage)
            .read_only(bot_config.read_only),
        |builder, kind| builder.boxed_logic_adapter(logic_adapter(*kind, bot_config)),
    );
    let bot = builder.build().map_err(TermbotError::from)?;

    info!(
        "Bot '{}' ready with {} stored statements",
        bot.name(),
        bot.storage().count().map_err(TermbotError::from)?
    );
    Ok(bot)
}

fn logic_adapter(kind: LogicAdapterKind, config: &BotConfig) -> Box<dyn LogicAdapter> {
    match kind {
        LogicAdapterKind::BestMatch => Box::new(
            BestMatch::new()
                .maximum_similarity_threshold(config.maximum_similarity_threshold)
                .default_response(config.default_response.clone()),
        ),
        LogicAdapterKind::Time => Box::new(TimeLogicAdapter::new()),
        LogicAdapterKind::Math => Box::new(MathematicalEvaluation::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use termbot_dialog::ListTrainer;

    fn config_in(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.bot.database = dir.join("data/bot_db.sqlite3");
        config.runtime.database = dir.join("data/db.sqlite3");
        config
    }

    #[test]
    fn test_build_bot_creates_datastore() -> Result<()> {
        let dir = tempdir()?;
        let config = config_in(dir.path());
        let bot = build_bot(&config)?;
        assert_eq!(bot.name(), "TerminalBot");
        assert!(config.bot.database.is_file());
        assert!(!config.runtime.database.exists());
        Ok(())
    }

    #[test]
    fn test_configured_adapters_answer() -> Result<()> {
        let dir = tempdir()?;
        let mut bot = build_bot(&config_in(dir.path()))?;
        assert_eq!(bot.get_response("What is 4 + 9?")?.text, "4 + 9 = 13");
        assert!(bot
            .get_response("What time is it?")?
            .text
            .starts_with("The current time is "));
        Ok(())
    }

    #[test]
    fn test_default_response_is_used_for_unknown_input() -> Result<()> {
        let dir = tempdir()?;
        let mut config = config_in(dir.path());
        config.bot.logic_adapters = vec![LogicAdapterKind::BestMatch];
        config.bot.default_response = Some("I do not know yet.".to_string());
        config.bot.read_only = true;

        let mut bot = build_bot(&config)?;
        assert_eq!(bot.get_response("hello")?.text, "I do not know yet.");
        Ok(())
    }

    #[test]
    fn test_learning_persists_between_builds() -> Result<()> {
        let dir = tempdir()?;
        let config = config_in(dir.path());
        {
            let mut bot = build_bot(&config)?;
            ListTrainer::new(&mut bot)
                .train(&["Who built you?", "Someone who wanted a chat client in a terminal."])
                .map_err(TermbotError::from)?;
        }
        let mut bot = build_bot(&config)?;
        assert_eq!(
            bot.get_response("Who built you?")?.text,
            "Someone who wanted a chat client in a terminal."
        );
        Ok(())
    }
}
