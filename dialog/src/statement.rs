//! # Statements
//!
//! File: dialog/src/statement.rs
//! Author: Christi Mahu
//!
//! A `Statement` is one line of dialog: what was said, what it was said in
//! response to, which conversation it belongs to and who said it. Learned
//! associations are nothing more than stored statements whose
//! `in_response_to` points at another statement's text.
//!
use crate::text;
use chrono::{DateTime, Utc};
use std::fmt;

/// Persona prefix marking statements produced by a bot.
pub const BOT_PERSONA_PREFIX: &str = "bot:";

/// A single line of dialog, stored or produced as a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Row id once stored.
    pub id: Option<i64>,
    pub text: String,
    /// Normalized `text`, see [`text::search_text`].
    pub search_text: String,
    pub conversation: String,
    pub persona: String,
    pub in_response_to: Option<String>,
    /// Normalized `in_response_to`; empty when there is none.
    pub search_in_response_to: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    /// How sure the producing logic adapter is. Never stored.
    pub confidence: f64,
}

impl Statement {
    /// Creates a statement with search fields derived from `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: None,
            search_text: text::search_text(&text),
            text,
            conversation: String::new(),
            persona: String::new(),
            in_response_to: None,
            search_in_response_to: String::new(),
            created_at: Utc::now(),
            tags: Vec::new(),
            confidence: 0.0,
        }
    }

    pub fn in_response_to(mut self, previous: Option<impl Into<String>>) -> Self {
        self.in_response_to = previous.map(Into::into);
        self.search_in_response_to = self
            .in_response_to
            .as_deref()
            .map(text::search_text)
            .unwrap_or_default();
        self
    }

    pub fn conversation(mut self, conversation: impl Into<String>) -> Self {
        self.conversation = conversation.into();
        self
    }

    pub fn persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// True when the persona marks this as something a bot said.
    pub fn is_from_bot(&self) -> bool {
        self.persona.starts_with(BOT_PERSONA_PREFIX)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
