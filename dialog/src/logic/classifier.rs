//! Bernoulli naive Bayes over word presence, used to recognise phrasings of a
//! question (e.g. "what time is it") without matching them literally.

use crate::text;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Binary classifier trained once from labelled example phrases.
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    vocabulary: BTreeSet<String>,
    positive: LabelModel,
    negative: LabelModel,
}

#[derive(Debug, Clone, Default)]
struct LabelModel {
    documents: usize,
    /// For each vocabulary word, how many documents of this label contain it.
    word_documents: HashMap<String, usize>,
}

impl LabelModel {
    /// Laplace-smoothed P(word present | label).
    fn presence(&self, word: &str) -> f64 {
        let seen = self.word_documents.get(word).copied().unwrap_or(0);
        (seen as f64 + 1.0) / (self.documents as f64 + 2.0)
    }
}

impl NaiveBayesClassifier {
    pub fn train(positive: &[&str], negative: &[&str]) -> Self {
        let vocabulary = positive
            .iter()
            .chain(negative)
            .flat_map(|phrase| text::tokens(phrase))
            .collect();
        Self {
            vocabulary,
            positive: Self::model(positive),
            negative: Self::model(negative),
        }
    }

    fn model(phrases: &[&str]) -> LabelModel {
        let mut model = LabelModel {
            documents: phrases.len(),
            ..Default::default()
        };
        for phrase in phrases {
            let words: HashSet<String> = text::tokens(phrase).into_iter().collect();
            for word in words {
                *model.word_documents.entry(word).or_default() += 1;
            }
        }
        model
    }

    /// Log joint likelihood of `text` under the positive and negative labels.
    pub fn log_likelihoods(&self, text: &str) -> (f64, f64) {
        let present: HashSet<String> = text::tokens(text).into_iter().collect();
        let total = (self.positive.documents + self.negative.documents) as f64;
        let score = |model: &LabelModel| {
            let prior = (model.documents as f64 / total).ln();
            self.vocabulary.iter().fold(prior, |acc, word| {
                let p = model.presence(word);
                acc + if present.contains(word) { p.ln() } else { (1.0 - p).ln() }
            })
        };
        (score(&self.positive), score(&self.negative))
    }

    /// True when `text` is more likely positive. Ties go negative.
    pub fn classify(&self, text: &str) -> bool {
        let (positive, negative) = self.log_likelihoods(text);
        positive > negative
    }
}
