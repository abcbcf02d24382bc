//! # TerminalBot Dialog Engine
//!
//! File: dialog/src/lib.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A retrieval-based dialog engine. It learns which statements follow which,
//! stores them in SQLite, and answers new input with whatever followed the
//! closest statement it has seen. Special cases (the time of day, arithmetic)
//! are handled by dedicated logic adapters that can override learned answers.
//!
//! ## Architecture
//!
//! - `chatbot`: the `ChatBot` agent and its builder.
//! - `storage`: the SQLite statement store.
//! - `logic`: pluggable response strategies (`BestMatch`, `TimeLogicAdapter`,
//!   `MathematicalEvaluation`).
//! - `trainers` / `corpus`: seeding the store from lists and bundled YAML corpora.
//! - `statement` / `text`: the data model and text comparison helpers.
//! - `error`: `DialogError` and the crate `Result`.
//!
//! ## Examples
//!
//! ```rust
//! use termbot_dialog::{BestMatch, ChatBot, ListTrainer, SqlStorage};
//!
//! # fn run() -> termbot_dialog::Result<()> {
//! let mut bot = ChatBot::builder("TerminalBot")
//!     .storage(SqlStorage::open_in_memory()?)
//!     .logic_adapter(BestMatch::new())
//!     .build()?;
//! ListTrainer::new(&mut bot).train(&["How do I exit?", "Type /quit and press Enter."])?;
//! assert_eq!(bot.get_response("How do I exit?")?.text, "Type /quit and press Enter.");
//! # Ok(())
//! # }
//! ```
//!
pub mod chatbot;
pub mod corpus;
pub mod error;
pub mod logic;
pub mod statement;
pub mod storage;
pub mod text;
pub mod trainers;

pub use chatbot::{ChatBot, ChatBotBuilder};
pub use error::{DialogError, Result};
pub use logic::{
    BestMatch, LogicAdapter, LogicAdapterKind, MathematicalEvaluation, TimeLogicAdapter,
};
pub use statement::Statement;
pub use storage::SqlStorage;
pub use trainers::{CorpusTrainer, ListTrainer};
