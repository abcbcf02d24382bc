//! # Logic Adapters
//!
//! File: dialog/src/logic/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A logic adapter is one strategy for answering an input statement. The
//! `ChatBot` consults its adapters in order; each adapter that can handle the
//! input proposes a response with a confidence, and the most confident
//! proposal wins.
//!
//! ## Architecture
//!
//! - `best_match`: answers with what was learned in response to the closest
//!   known statement.
//! - `time`: recognises "what time is it" style questions.
//! - `math`: evaluates arithmetic written with digits or English words.
//! - `classifier`: the small naive Bayes model behind the time adapter.
//!
//! `LogicAdapterKind` is the serializable name of an adapter, used by
//! configuration files to list adapters in order.
//!
use crate::error::Result;
use crate::statement::Statement;
use crate::storage::SqlStorage;
use serde::Deserialize;
use std::fmt;

pub mod best_match;
pub mod classifier;
pub mod math;
pub mod time;

pub use best_match::BestMatch;
pub use math::MathematicalEvaluation;
pub use time::TimeLogicAdapter;

/// A pluggable strategy that proposes a response to an input statement.
pub trait LogicAdapter {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether this adapter should be asked about `input` at all.
    fn can_process(&self, _input: &Statement) -> bool {
        true
    }

    /// Proposes a response. `confidence` on the returned statement is in `[0, 1]`.
    fn process(&self, input: &Statement, storage: &SqlStorage) -> Result<Statement>;
    /// Whether responses chosen from this adapter may be stored as learned replies.
    fn learnable(&self) -> bool {
        true
    }
}

/// Adapter names accepted in configuration files.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogicAdapterKind {
    BestMatch,
    Time,
    Math,
}

impl LogicAdapterKind {
    /// The standard adapter order: learned answers first, then the special cases.
    pub fn defaults() -> Vec<Self> {
        vec![Self::BestMatch, Self::Time, Self::Math]
    }
}

impl fmt::Display for LogicAdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BestMatch => "best_match",
            Self::Time => "time",
            Self::Math => "math",
        })
    }
}
