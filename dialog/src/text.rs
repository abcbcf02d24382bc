//! # Text Normalization and Comparison
//!
//! File: dialog/src/text.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Helpers shared by storage, trainers and logic adapters:
//! - `clean_whitespace`: input preprocessing applied before every lookup.
//! - `search_text`: the normalized key that links a statement to the
//!   statements stored as responses to it.
//! - `similarity`: a Levenshtein ratio used to rank stored statements against
//!   the input.
//!

/// Trims the text and collapses every internal run of whitespace to one space.
pub fn clean_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase alphanumeric tokens of `text`, in order.
pub fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Normalized index form of a statement: its tokens joined by single spaces.
///
/// `"How do I exit?"` and `"how  do i EXIT"` share the search text
/// `"how do i exit"`.
pub fn search_text(text: &str) -> String {
    tokens(text).join(" ")
}

/// Case-insensitive similarity of two texts in `[0.0, 1.0]`, rounded to two
/// decimals.
///
/// Computed as `1 - levenshtein(a, b) / max(len(a), len(b))` over characters.
/// Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    let ratio = 1.0 - levenshtein(&a, &b) as f64 / longest as f64;
    (ratio * 100.0).round() / 100.0
}

/// Edit distance with a single rolling row.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_whitespace() {
        assert_eq!(clean_whitespace("  hello \t  there \n"), "hello there");
        assert_eq!(clean_whitespace("   "), "");
    }

    #[test]
    fn test_search_text_ignores_case_and_punctuation() {
        assert_eq!(search_text("How do I exit?"), "how do i exit");
        assert_eq!(search_text("how  do i EXIT"), "how do i exit");
        assert_eq!(search_text("?!"), "");
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("Hello", "hello"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_similarity_ranks_closer_text_higher() {
        let close = similarity("how are you", "how are you?");
        let far = similarity("how are you", "what is your name?");
        assert!(close > far);
        // One insertion over twelve characters.
        assert_eq!(close, 0.92);
    }

    #[test]
    fn test_levenshtein_classic_pairs() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
        assert_eq!(levenshtein(&chars("flaw"), &chars("lawn")), 2);
    }
}
