//! # Trainers
//!
//! File: dialog/src/trainers.rs
//! Author: Christi Mahu
//!
//! Trainers feed example dialog into a bot's statement store:
//! - `ListTrainer` takes one conversation as a list of lines.
//! - `CorpusTrainer` takes every conversation of one or more corpora, see
//!   [`crate::corpus`].
//!
//! Both store lines under the `training` conversation, each line in response
//! to the one before it. Training is idempotent: already-known pairs are
//! ignored by the store.
//!
use crate::chatbot::ChatBot;
use crate::corpus;
use crate::error::Result;
use crate::statement::Statement;
use tracing::info;

/// Conversation id under which trained statements are stored.
pub const TRAINING_CONVERSATION: &str = "training";

/// Statements for one conversation: each line answers the previous one.
fn conversation_statements<S: AsRef<str>>(lines: &[S], tags: &[String]) -> Vec<Statement> {
    let mut previous: Option<&str> = None;
    lines
        .iter()
        .map(|line| {
            let text = line.as_ref();
            let statement = Statement::new(text)
                .in_response_to(previous)
                .conversation(TRAINING_CONVERSATION)
                .tags(tags.iter().cloned());
            previous = Some(text);
            statement
        })
        .collect()
}

/// Trains a bot on a single conversation given as a list of lines.
pub struct ListTrainer<'a> {
    bot: &'a mut ChatBot,
}

impl<'a> ListTrainer<'a> {
    pub fn new(bot: &'a mut ChatBot) -> Self {
        Self { bot }
    }

    /// Returns the number of statements that were new to the store.
    pub fn train<S: AsRef<str>>(&mut self, conversation: &[S]) -> Result<usize> {
        let statements = conversation_statements(conversation, &[]);
        let added = self.bot.storage_mut().create_many(&statements)?;
        info!(
            "List training: {} lines, {} new statements",
            conversation.len(),
            added
        );
        Ok(added)
    }
}

/// Trains a bot on conversational corpora.
pub struct CorpusTrainer<'a> {
    bot: &'a mut ChatBot,
}

impl<'a> CorpusTrainer<'a> {
    pub fn new(bot: &'a mut ChatBot) -> Self {
        Self { bot }
    }

    /// Loads `corpus_id` (see [`corpus::load`]) and stores every
    /// conversation, tagged with the corpus categories. Returns the number of
    /// statements that were new to the store.
    pub fn train(&mut self, corpus_id: &str) -> Result<usize> {
        let mut added = 0;
        for corpus in corpus::load(corpus_id)? {
            let statements: Vec<Statement> = corpus
                .conversations
                .iter()
                .flat_map(|conversation| conversation_statements(conversation, &corpus.categories))
                .collect();
            let new = self.bot.storage_mut().create_many(&statements)?;
            info!(
                "Corpus training '{}': {} conversations, {} new statements",
                corpus.name,
                corpus.conversations.len(),
                new
            );
            added += new;
        }
        Ok(added)
    }
}
