//! # Best Match Adapter
//!
//! File: dialog/src/logic/best_match.rs
//! Author: Christi Mahu
//!
//! Answers with what the bot learned in response to the stored statement
//! closest to the input. Closeness is `text::similarity`, and that similarity
//! becomes the response's confidence.
//!
//! When nothing comparable is stored the adapter still answers, with
//! confidence 0: the configured default response if there is one, otherwise a
//! random stored statement, otherwise the input itself.
//!
use super::LogicAdapter;
use crate::error::Result;
use crate::statement::Statement;
use crate::storage::SqlStorage;
use crate::text;
use tracing::debug;

/// Similarity at which the search stops looking for a closer statement.
pub const DEFAULT_MAXIMUM_SIMILARITY_THRESHOLD: f64 = 0.95;

pub struct BestMatch {
    maximum_similarity_threshold: f64,
    default_response: Option<String>,
}

impl Default for BestMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl BestMatch {
    pub fn new() -> Self {
        Self {
            maximum_similarity_threshold: DEFAULT_MAXIMUM_SIMILARITY_THRESHOLD,
            default_response: None,
        }
    }

    pub fn maximum_similarity_threshold(mut self, threshold: f64) -> Self {
        self.maximum_similarity_threshold = threshold;
        self
    }

    pub fn default_response(mut self, response: Option<String>) -> Self {
        self.default_response = response;
        self
    }

    /// Closest stored statement that has at least one learned response.
    fn closest_match(&self, input: &Statement, storage: &SqlStorage) -> Result<Option<Statement>> {
        let mut closest: Option<Statement> = None;
        for candidate in storage.response_candidates()? {
            let confidence = text::similarity(&input.text, &candidate.text);
            if closest.as_ref().map_or(true, |best| confidence > best.confidence) {
                closest = Some(candidate.confidence(confidence));
            }
            if confidence >= self.maximum_similarity_threshold {
                break;
            }
        }
        Ok(closest)
    }

    fn fallback(&self, input: &Statement, storage: &SqlStorage) -> Result<Statement> {
        let text = match &self.default_response {
            Some(text) => text.clone(),
            None => match storage.get_random()? {
                Some(statement) => statement.text,
                None => input.text.clone(),
            },
        };
        Ok(Statement::new(text).confidence(0.0))
    }
}

impl LogicAdapter for BestMatch {
    fn name(&self) -> &str {
        "best_match"
    }

    fn process(&self, input: &Statement, storage: &SqlStorage) -> Result<Statement> {
        let Some(matched) = self.closest_match(input, storage)? else {
            debug!("No stored statement to compare against");
            return self.fallback(input, storage);
        };
        debug!(
            "Closest match to '{}' is '{}' ({:.2})",
            input.text, matched.text, matched.confidence
        );

        match storage.responses_to(&matched.search_text)?.into_iter().next() {
            Some(response) => Ok(response.confidence(matched.confidence)),
            None => self.fallback(input, storage),
        }
    }
}
