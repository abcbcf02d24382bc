//! # TerminalBot Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components that every run
//! of `termbot` goes through before the chat starts.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and error handling utilities
//! - `runtime`: Init-once process settings and the runtime datastore
//! - `bot`: Builds the dialog agent from configuration
//!
//! ```rust
//! use crate::core::{bot, config, runtime};
//!
//! let config = config::load_config()?;
//! runtime::configure(&config.runtime)?;
//! let mut bot = bot::build_bot(&config)?;
//! ```
//!
pub mod bot;
pub mod config;
pub mod error;
pub mod runtime;
