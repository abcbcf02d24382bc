//! # Dialog Engine Error Types
//!
//! File: dialog/src/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Every fallible operation in the dialog engine returns [`Result<T>`], whose
//! error side is [`DialogError`]. Storage, corpus parsing and file access
//! failures are converted with `#[from]`, so callers can use `?` throughout.
//!
//! The engine does not try to recover from any of these: a corrupt datastore
//! or a missing corpus is reported to the caller, which decides whether the
//! process should stop.
//!
use thiserror::Error;

/// Errors produced by the dialog engine.
#[derive(Error, Debug)]
pub enum DialogError {
    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: rusqlite::Error,
    },

    #[error("Corpus '{name}' not found.")]
    CorpusNotFound { name: String },

    #[error("Failed to parse corpus '{name}': {source}")]
    Corpus {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result alias used across the dialog engine.
pub type Result<T> = std::result::Result<T, DialogError>;
