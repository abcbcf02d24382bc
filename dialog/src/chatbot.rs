//! # Chatbot
//!
//! File: dialog/src/chatbot.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `ChatBot` ties the pieces together: it owns the statement store and an
//! ordered list of logic adapters, answers input with the most confident
//! proposal, and (unless read-only) learns from every exchange.
//!
//! ## Response selection
//!
//! 1. Whitespace in the input is collapsed.
//! 2. Every adapter that can process the input proposes a response. The most
//!    confident proposal wins; on a tie the earlier adapter wins.
//! 3. With three or more proposals, a response proposed by more than one
//!    adapter beats the single most confident one.
//! 4. The response is stamped as the bot's reply to the input in the current
//!    conversation.
//!
//! ## Learning
//!
//! The input is stored as a response to the bot's previous reply in this
//! session, and the bot's reply is stored as a response to the input. Over
//! time this teaches the bot what people say after what.
//!
//! ## Examples
//!
//! ```rust
//! use termbot_dialog::{BestMatch, ChatBot, SqlStorage};
//!
//! # fn run() -> termbot_dialog::Result<()> {
//! let mut bot = ChatBot::builder("TerminalBot")
//!     .storage(SqlStorage::open_in_memory()?)
//!     .logic_adapter(BestMatch::new())
//!     .build()?;
//! let reply = bot.get_response("Hello")?;
//! println!("bot: {}", reply);
//! # Ok(())
//! # }
//! ```
//!
use crate::error::{DialogError, Result};
use crate::logic::LogicAdapter;
use crate::statement::{Statement, BOT_PERSONA_PREFIX};
use crate::storage::SqlStorage;
use crate::text;
use chrono::Utc;
use tracing::{debug, trace};

/// A dialog agent backed by a statement store.
pub struct ChatBot {
    name: String,
    storage: SqlStorage,
    logic_adapters: Vec<Box<dyn LogicAdapter>>,
    read_only: bool,
    conversation: String,
    previous_response: Option<Statement>,
}

/// Builder for [`ChatBot`]. Storage and at least one adapter are required.
pub struct ChatBotBuilder {
    name: String,
    storage: Option<SqlStorage>,
    logic_adapters: Vec<Box<dyn LogicAdapter>>,
    read_only: bool,
    conversation: Option<String>,
}

impl ChatBotBuilder {
    pub fn storage(mut self, storage: SqlStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Appends an adapter. Adapters are consulted in the order they are added.
    pub fn logic_adapter(mut self, adapter: impl LogicAdapter + 'static) -> Self {
        self.logic_adapters.push(Box::new(adapter));
        self
    }

    pub fn boxed_logic_adapter(mut self, adapter: Box<dyn LogicAdapter>) -> Self {
        self.logic_adapters.push(adapter);
        self
    }

    /// A read-only bot answers but never stores anything.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Conversation id for this session. Defaults to a timestamp-based id.
    pub fn conversation(mut self, conversation: impl Into<String>) -> Self {
        self.conversation = Some(conversation.into());
        self
    }

    pub fn build(self) -> Result<ChatBot> {
        let storage = self
            .storage
            .ok_or_else(|| DialogError::Config("a chatbot needs a storage".into()))?;
        if self.logic_adapters.is_empty() {
            return Err(DialogError::Config(
                "a chatbot needs at least one logic adapter".into(),
            ));
        }
        let conversation = self
            .conversation
            .unwrap_or_else(|| format!("session-{}", Utc::now().format("%Y%m%dT%H%M%S%.6f")));
        debug!(
            "Built chatbot '{}' with adapters [{}], conversation '{}'",
            self.name,
            self.logic_adapters
                .iter()
                .map(|a| a.name())
                .collect::<Vec<_>>()
                .join(", "),
            conversation
        );
        Ok(ChatBot {
            name: self.name,
            storage,
            logic_adapters: self.logic_adapters,
            read_only: self.read_only,
            conversation,
            previous_response: None,
        })
    }
}

impl ChatBot {
    pub fn builder(name: impl Into<String>) -> ChatBotBuilder {
        ChatBotBuilder {
            name: name.into(),
            storage: None,
            logic_adapters: Vec::new(),
            read_only: false,
            conversation: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conversation(&self) -> &str {
        &self.conversation
    }

    pub fn storage(&self) -> &SqlStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut SqlStorage {
        &mut self.storage
    }

    /// Answers `text` and, unless read-only, learns from the exchange.
    ///
    /// The input is always learned. The reply is only stored when every
    /// adapter behind it is [learnable](LogicAdapter::learnable), so answers
    /// that go stale, such as the current time, are never replayed.
    pub fn get_response(&mut self, text: &str) -> Result<Statement> {
        let input = Statement::new(text::clean_whitespace(text)).conversation(&self.conversation);
        let (chosen, learnable) = self.generate_response(&input)?;

        let response = Statement::new(chosen.text)
            .in_response_to(Some(input.text.as_str()))
            .conversation(&self.conversation)
            .persona(format!("{BOT_PERSONA_PREFIX}{}", self.name))
            .confidence(chosen.confidence);

        if !self.read_only {
            let previous = self.previous_response.take();
            self.learn_response(input, previous.as_ref())?;
            if learnable {
                self.storage.create(&response)?;
            } else {
                trace!("Not storing '{}': its adapter is not learnable", response.text);
            }
        }
        self.previous_response = Some(response.clone());
        Ok(response)
    }

    /// Stores `statement` as a response to `previous`. Returns whether the
    /// pair was new.
    pub fn learn_response(&mut self, statement: Statement, previous: Option<&Statement>) -> Result<bool> {
        let statement = statement.in_response_to(previous.map(|p| p.text.as_str()));
        trace!(
            "Learning '{}' as a response to {:?}",
            statement.text,
            statement.in_response_to
        );
        self.storage.create(&statement)
    }

    /// The chosen reply and whether it may be stored.
    fn generate_response(&self, input: &Statement) -> Result<(Statement, bool)> {
        let mut proposals = Vec::new();
        let mut learnable = Vec::new();
        let mut best: Option<(Statement, bool)> = None;

        for adapter in &self.logic_adapters {
            if !adapter.can_process(input) {
                trace!("Adapter '{}' cannot process the input", adapter.name());
                continue;
            }
            let proposal = adapter.process(input, &self.storage)?;
            debug!(
                "Adapter '{}' proposed '{}' ({:.2})",
                adapter.name(),
                proposal.text,
                proposal.confidence
            );
            if best.as_ref().map_or(true, |(b, _)| proposal.confidence > b.confidence) {
                best = Some((proposal.clone(), adapter.learnable()));
            }
            proposals.push(proposal);
            learnable.push(adapter.learnable());
        }

        if proposals.len() >= 3 {
            if let Some(agreed) = most_agreed(&proposals) {
                debug!("Adapters agreed on '{}'", agreed.text);
                let all_learnable = proposals
                    .iter()
                    .zip(&learnable)
                    .filter(|(p, _)| same_reply(p, &agreed))
                    .all(|(_, storable)| *storable);
                best = Some((agreed, all_learnable));
            }
        }

        Ok(best.unwrap_or_else(|| (Statement::new(input.text.clone()).confidence(0.0), true)))
    }
}

fn same_reply(a: &Statement, b: &Statement) -> bool {
    a.text == b.text && a.in_response_to == b.in_response_to
}

/// The proposal made by more than one adapter most often, keeping the
/// highest confidence among its copies. Earlier proposals win ties.
fn most_agreed(proposals: &[Statement]) -> Option<Statement> {
    let mut groups: Vec<(&Statement, usize)> = Vec::new();
    for proposal in proposals {
        match groups.iter_mut().find(|group| same_reply(group.0, proposal)) {
            Some(group) => {
                group.1 += 1;
                if group.0.confidence < proposal.confidence {
                    group.0 = proposal;
                }
            }
            None => groups.push((proposal, 1)),
        }
    }
    let mut winner: Option<(&Statement, usize)> = None;
    for (statement, count) in groups {
        if winner.map_or(true, |(_, best)| count > best) {
            winner = Some((statement, count));
        }
    }
    winner
        .filter(|(_, count)| *count > 1)
        .map(|(statement, _)| statement.clone())
}
