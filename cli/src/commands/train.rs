//! # Training Routine (`termbot --fresh-train`)
//!
//! File: cli/src/commands/train.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Seeds the bot's statement datastore before chatting:
//! 1. every configured corpus (by default the bundled English greetings and
//!    conversations) is loaded through a `CorpusTrainer`,
//! 2. a handful of hand-written question/answer pairs about the client
//!    itself are added through a `ListTrainer`.
//!
//! Progress lines are written to `out` (stdout in the binary).
//!
//! Training can be repeated safely: the datastore ignores statements it
//! already holds, so a second `--fresh-train` neither fails nor grows it.
//!
use crate::core::config::TrainingConfig;
use crate::core::error::{Result, TermbotError};
use anyhow::Context;
use std::io::Write;
use termbot_dialog::{ChatBot, CorpusTrainer, ListTrainer};
use tracing::info;

/// Three question/answer pairs, each answer following its question.
pub const CUSTOM_PAIRS: [&str; 6] = [
    "Who built you?",
    "I was set up with Rust and a SQLite-backed dialog engine.",
    "What is this assignment?",
    "A terminal chat client powered by a machine-learning dialog engine.",
    "How do I exit?",
    "Type /quit and press Enter.",
];

/// Runs the one-time training pass.
///
/// # Arguments
///
/// * `bot` - The bot whose datastore is filled.
/// * `config` - Which corpora to load.
/// * `out` - Where the `[trainer]` progress lines go.
///
/// # Errors
///
/// Fails on an unknown or malformed corpus, or when the datastore cannot be
/// written. Statements stored before the failure are kept.
pub fn initial_train<W: Write>(
    bot: &mut ChatBot,
    config: &TrainingConfig,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "[trainer] Loading English greetings & conversations corpus…")?;
    let mut added = 0;
    for corpus in &config.corpora {
        added += CorpusTrainer::new(bot)
            .train(corpus)
            .map_err(TermbotError::from)
            .with_context(|| format!("Failed to train on corpus '{}'", corpus))?;
    }

    writeln!(out, "[trainer] Adding minimal custom pairs…")?;
    added += ListTrainer::new(bot)
        .train(&CUSTOM_PAIRS)
        .map_err(TermbotError::from)
        .context("Failed to train on custom pairs")?;

    writeln!(out, "[trainer] Training complete.\n")?;
    info!(
        "Training added {} new statements ({} stored)",
        added,
        bot.storage().count().map_err(TermbotError::from)?
    );
    Ok(())
}
