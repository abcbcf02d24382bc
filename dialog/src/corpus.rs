//! # Conversational Corpora
//!
//! File: dialog/src/corpus.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A corpus is a YAML document listing example conversations:
//!
//! ```yaml
//! categories:
//! - greetings
//! conversations:
//! - - Hello
//!   - Hi there!
//! ```
//!
//! Each inner list is one conversation; every line answers the line before it.
//!
//! ## Resolution
//!
//! `load` accepts, in order of precedence:
//! 1. The id of a corpus bundled into the binary (`english.greetings`).
//! 2. A language prefix of bundled ids (`english` loads every English corpus).
//! 3. A path to a YAML file, or to a directory whose `.yml`/`.yaml` files are
//!    loaded in name order.
//!
use crate::error::{DialogError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Corpora compiled into the binary, by id.
const EMBEDDED: &[(&str, &str)] = &[
    (
        "english.greetings",
        include_str!("../corpus/english/greetings.yml"),
    ),
    (
        "english.conversations",
        include_str!("../corpus/english/conversations.yml"),
    ),
];

/// One parsed corpus document.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Corpus {
    /// Where the corpus came from: a bundled id or a file path.
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub conversations: Vec<Vec<String>>,
}

impl Corpus {
    /// Parses a corpus document.
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let mut corpus: Corpus =
            serde_yaml::from_str(source).map_err(|source| DialogError::Corpus {
                name: name.to_string(),
                source,
            })?;
        corpus.name = name.to_string();
        Ok(corpus)
    }
}

/// Ids of the bundled corpora.
pub fn available() -> impl Iterator<Item = &'static str> {
    EMBEDDED.iter().map(|(id, _)| *id)
}

/// Resolves `id` to one or more corpora, see the module docs.
pub fn load(id: &str) -> Result<Vec<Corpus>> {
    if let Some((name, source)) = EMBEDDED.iter().find(|(name, _)| *name == id) {
        debug!("Loading bundled corpus '{}'", name);
        return Ok(vec![Corpus::parse(name, source)?]);
    }

    let prefix = format!("{id}.");
    let by_language: Vec<_> = EMBEDDED
        .iter()
        .filter(|(name, _)| name.starts_with(&prefix))
        .collect();
    if !by_language.is_empty() {
        debug!("Loading {} bundled corpora for '{}'", by_language.len(), id);
        return by_language
            .into_iter()
            .map(|(name, source)| Corpus::parse(name, source))
            .collect();
    }

    let path = Path::new(id);
    if path.is_file() {
        return Ok(vec![load_file(path)?]);
    }
    if path.is_dir() {
        let mut files: Vec<_> = fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .is_some_and(|ext| ext == "yml" || ext == "yaml")
            })
            .collect();
        files.sort();
        info!("Loading {} corpus files from {}", files.len(), path.display());
        return files.iter().map(|file| load_file(file)).collect();
    }

    Err(DialogError::CorpusNotFound {
        name: id.to_string(),
    })
}

fn load_file(path: &Path) -> Result<Corpus> {
    debug!("Loading corpus file {}", path.display());
    let source = fs::read_to_string(path)?;
    Corpus::parse(&path.display().to_string(), &source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_bundled_corpora_parse() -> Result<()> {
        for id in available() {
            let corpora = load(id)?;
            assert_eq!(corpora.len(), 1);
            assert_eq!(corpora[0].name, id);
            assert!(!corpora[0].conversations.is_empty(), "{id} is empty");
            assert!(corpora[0]
                .conversations
                .iter()
                .all(|c| c.len() >= 2), "{id} has a one-line conversation");
        }
        Ok(())
    }

    #[test]
    fn test_language_prefix_loads_all_bundled() -> Result<()> {
        let names: Vec<_> = load("english")?.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["english.greetings", "english.conversations"]);
        Ok(())
    }

    #[test]
    fn test_greetings_are_categorised() -> Result<()> {
        let corpus = &load("english.greetings")?[0];
        assert_eq!(corpus.categories, vec!["greetings"]);
        Ok(())
    }

    #[test]
    fn test_unknown_corpus() {
        let err = load("klingon.greetings").unwrap_err();
        assert!(matches!(err, DialogError::CorpusNotFound { .. }));
    }

    #[test]
    fn test_loads_files_and_directories() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("b.yml"),
            "conversations:\n- - Ahoy\n  - Ahoy there, matey\n",
        )?;
        fs::write(
            dir.path().join("a.yaml"),
            "categories: [ships]\nconversations:\n- - Is that a ship?\n  - A fine one.\n",
        )?;
        fs::write(dir.path().join("notes.txt"), "not a corpus")?;

        let corpora = load(dir.path().to_str().expect("utf-8 temp path"))?;
        assert_eq!(corpora.len(), 2);
        assert_eq!(corpora[0].categories, vec!["ships"]);
        assert_eq!(corpora[1].conversations[0][1], "Ahoy there, matey");

        let single = load(dir.path().join("b.yml").to_str().expect("utf-8 temp path"))?;
        assert_eq!(single.len(), 1);
        Ok(())
    }

    #[test]
    fn test_malformed_corpus() {
        let err = Corpus::parse("broken", "conversations: 12").unwrap_err();
        assert!(matches!(err, DialogError::Corpus { .. }));
        assert!(err.to_string().contains("broken"));
    }
}
