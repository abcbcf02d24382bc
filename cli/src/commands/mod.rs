//! # TerminalBot Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The two things `termbot` does once the bot is built:
//!
//! - `train`: the one-time training pass behind `--fresh-train`
//! - `chat`: the interactive read/answer loop
//!
//! `main.rs` runs them in that order.
//!

/// Seeds the bot datastore from the configured corpora and the custom pairs.
pub mod train;
/// The terminal chat loop and the `Responder` seam it talks to.
pub mod chat;
