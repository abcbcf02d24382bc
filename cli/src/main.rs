//! # TerminalBot Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This file serves as the main entry point for the `termbot` binary.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system (`RUST_LOG`, warnings by default, stderr)
//! - Running the startup sequence and the chat loop
//!
//! ## Examples
//!
//! ```bash
//! # Chat with whatever the bot already knows
//! termbot
//!
//! # Train on the bundled corpus and custom pairs first
//! termbot --fresh-train
//!
//! # See what the bot is doing
//! RUST_LOG=debug termbot
//! ```
//!
//! Processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging
//! 3. Load configuration and configure the runtime
//! 4. Build the bot, optionally train it
//! 5. Chat until the user leaves
//! 6. Format and display any errors that occur (exit status 1)
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // The training routine and the chat loop
mod common; // Shared utilities (fs)
mod core; // Core infrastructure (errors, config, runtime, bot factory)

use crate::commands::{chat, train};
use crate::core::{bot, config, error::Result, runtime};

/// Defines the command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "termbot",
    about = "🤖 TerminalBot: chat with a learning bot in your terminal",
    long_about = "Chat with a retrieval-based bot that remembers conversations in a local SQLite datastore.\n\
                  Type /quit (or quit, exit, /exit) or press Ctrl+D / Ctrl+C to leave.",
    version
)]
struct Cli {
    /// Train on the bundled English corpus and the custom pairs before chatting.
    #[arg(long)]
    fresh_train: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!("termbot failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    println!("Initializing bot…");
    let config = config::load_config()?;
    runtime::configure(&config.runtime)?;
    let mut bot = bot::build_bot(&config)?;

    if cli.fresh_train {
        train::initial_train(&mut bot, &config.training, &mut std::io::stdout())?;
    }

    chat::run(&mut bot).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fresh_train_flag() {
        assert!(!Cli::try_parse_from(["termbot"]).unwrap().fresh_train);
        assert!(Cli::try_parse_from(["termbot", "--fresh-train"]).unwrap().fresh_train);
        assert!(Cli::try_parse_from(["termbot", "--train"]).is_err());
    }
}
