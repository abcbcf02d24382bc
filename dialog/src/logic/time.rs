//! # Time of Day Adapter
//!
//! File: dialog/src/logic/time.rs
//! Author: Christi Mahu
//!
//! Answers questions about the current time. Whether the input *is* such a
//! question is decided by a naive Bayes classifier trained on the phrase lists
//! below, so "do you know what time it is" is recognised while "I had a great
//! time" is not.
//!
use super::classifier::NaiveBayesClassifier;
use super::LogicAdapter;
use crate::error::Result;
use crate::statement::Statement;
use crate::storage::SqlStorage;
use chrono::{Local, NaiveTime};

const TIME_QUESTIONS: &[&str] = &[
    "what time is it",
    "hey what time is it",
    "do you have the time",
    "do you know the time",
    "do you know what time it is",
    "what is the time",
    "tell me the time",
    "what is the current time",
];

const OTHER_PHRASES: &[&str] = &[
    "it is time to go to sleep",
    "what is your favorite color",
    "i had a great time",
    "thyme is my favorite herb",
    "do you have time to look at my essay",
    "how do you have the time to do all this",
    "what is it",
    "how are you",
    "who built you",
    "how do i exit",
    "what is this assignment",
    "what is four plus nine",
];

type Clock = Box<dyn Fn() -> NaiveTime>;

pub struct TimeLogicAdapter {
    classifier: NaiveBayesClassifier,
    clock: Clock,
}

impl Default for TimeLogicAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeLogicAdapter {
    /// Adapter reading the local wall clock.
    pub fn new() -> Self {
        Self::with_clock(|| Local::now().time())
    }

    /// Adapter reading the time from `clock` instead of the system.
    pub fn with_clock(clock: impl Fn() -> NaiveTime + 'static) -> Self {
        Self {
            classifier: NaiveBayesClassifier::train(TIME_QUESTIONS, OTHER_PHRASES),
            clock: Box::new(clock),
        }
    }

    pub fn is_time_question(&self, text: &str) -> bool {
        self.classifier.classify(text)
    }
}

impl LogicAdapter for TimeLogicAdapter {
    fn name(&self) -> &str {
        "time"
    }

    /// The answer goes stale as soon as the clock moves.
    fn learnable(&self) -> bool {
        false
    }

    fn process(&self, input: &Statement, _storage: &SqlStorage) -> Result<Statement> {
        let now = (self.clock)();
        let confidence = if self.is_time_question(&input.text) {
            1.0
        } else {
            0.0
        };
        Ok(Statement::new(format!("The current time is {}", now.format("%I:%M %p")))
            .confidence(confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_adapter() -> TimeLogicAdapter {
        TimeLogicAdapter::with_clock(|| NaiveTime::from_hms_opt(21, 41, 0).expect("valid time"))
    }

    #[test]
    fn test_recognises_time_questions() {
        let adapter = fixed_adapter();
        assert!(adapter.is_time_question("What time is it?"));
        assert!(adapter.is_time_question("Do you know the time"));
        assert!(adapter.is_time_question("what is the time right now"));
    }

    #[test]
    fn test_ignores_other_questions() {
        let adapter = fixed_adapter();
        for text in ["How do I exit?", "hello", "Who built you?", "what is your name", "i need time"] {
            assert!(!adapter.is_time_question(text), "misclassified {text:?}");
        }
    }

    #[test]
    fn test_response_uses_twelve_hour_clock() -> Result<()> {
        let storage = SqlStorage::open_in_memory()?;
        let adapter = fixed_adapter();

        let answer = adapter.process(&Statement::new("What time is it?"), &storage)?;
        assert_eq!(answer.text, "The current time is 09:41 PM");
        assert_eq!(answer.confidence, 1.0);

        let other = adapter.process(&Statement::new("Good morning"), &storage)?;
        assert_eq!(other.confidence, 0.0);
        Ok(())
    }

    #[test]
    fn test_answers_are_never_learned() {
        assert!(!fixed_adapter().learnable());
    }
}
