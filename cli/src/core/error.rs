//! # TerminalBot Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used by the terminal client. Failures
//! that come from the dialog engine keep their own type (`DialogError`) and
//! are wrapped here so that everything reaching `main` is one `anyhow::Error`.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `TermbotError`: A custom error enum using `thiserror` for client-level failures
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Configuration errors
//! - Filesystem errors
//! - Runtime bootstrap errors
//! - Dialog engine errors
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if config.bot.name.trim().is_empty() {
//!     anyhow::bail!(TermbotError::Config("bot name cannot be empty".into()));
//! }
//!
//! // Add context to errors using anyhow
//! let bot = build_bot(&config)
//!     .with_context(|| format!("Failed to open {}", config.bot.database.display()))?;
//! ```
//!
//! Only two conditions are handled without an error (empty input and
//! end-of-input/interrupt); everything else propagates to `main`, which prints
//! it and exits with a non-zero status.
//!
use thiserror::Error;

/// Custom error type for the terminal client.
#[derive(Error, Debug)]
pub enum TermbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Runtime datastore error: {source}")]
    RuntimeStore {
        #[from]
        source: rusqlite::Error,
    },

    #[error("Dialog engine error: {source}")]
    Dialog {
        #[from]
        source: termbot_dialog::DialogError,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use termbot_dialog::DialogError;

    #[test]
    fn test_error_display() {
        let config_err = TermbotError::Config("bot name cannot be empty".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: bot name cannot be empty"
        );

        let dialog_err: TermbotError = DialogError::CorpusNotFound {
            name: "english.pirate".into(),
        }
        .into();
        assert_eq!(
            dialog_err.to_string(),
            "Dialog engine error: Corpus 'english.pirate' not found."
        );
    }
}
