use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("Tagger failed: {0}")]
    Failed(String),

    #[error("Token '{0}' carries no part-of-speech tag")]
    MissingTag(String),
}

/// Part-of-speech tagging capability.
///
/// Implementations wrap an external model that is expensive to load, so a
/// single tagger is created once and passed by reference into every call
/// that needs it. Callers on several threads share it read-only.
pub trait Tagger: Send + Sync {
    /// Return one tag per token, in the same order and count as `tokens`.
    ///
    /// # Errors
    ///
    /// Returns `TaggerError` if the underlying model cannot tag the sentence.
    fn tag(&self, tokens: &[String]) -> Result<Vec<String>, TaggerError>;
}

/// Dictionary tagger: looks each token up in a fixed table.
///
/// Useful when tags come from a lexicon or were produced ahead of time.
/// Tokens missing from the table receive the fallback tag.
#[derive(Debug, Clone)]
pub struct LookupTagger {
    tags: HashMap<String, String>,
    fallback: String,
}

impl LookupTagger {
    #[must_use]
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            tags: HashMap::new(),
            fallback: fallback.into(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, word: impl Into<String>, tag: impl Into<String>) -> Self {
        self.tags.insert(word.into(), tag.into());
        self
    }

    pub fn insert(&mut self, word: impl Into<String>, tag: impl Into<String>) {
        self.tags.insert(word.into(), tag.into());
    }
}

impl Tagger for LookupTagger {
    fn tag(&self, tokens: &[String]) -> Result<Vec<String>, TaggerError> {
        Ok(tokens
            .iter()
            .map(|t| self.tags.get(t).unwrap_or(&self.fallback).clone())
            .collect())
    }
}

/// Split tagger output of the form `word_TAG word_TAG ...` into words and tags.
///
/// The tag is whatever follows the last underscore, so words that themselves
/// contain underscores survive intact.
///
/// # Errors
///
/// Returns `TaggerError::MissingTag` for a token with no underscore or an
/// empty tag.
pub fn split_tagged(line: &str) -> Result<(Vec<String>, Vec<String>), TaggerError> {
    let mut words = Vec::new();
    let mut tags = Vec::new();

    for token in line.split_whitespace() {
        match token.rsplit_once('_') {
            Some((word, tag)) if !tag.is_empty() => {
                words.push(word.to_string());
                tags.push(tag.to_string());
            }
            _ => return Err(TaggerError::MissingTag(token.to_string())),
        }
    }

    Ok((words, tags))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tagged() {
        let (words, tags) = split_tagged("the_DT big_JJ cat_NN sat_VBD").unwrap();
        assert_eq!(words, vec!["the", "big", "cat", "sat"]);
        assert_eq!(tags, vec!["DT", "JJ", "NN", "VBD"]);
    }

    #[test]
    fn test_split_tagged_keeps_inner_underscores() {
        let (words, tags) = split_tagged("snake_case_NN").unwrap();
        assert_eq!(words, vec!["snake_case"]);
        assert_eq!(tags, vec!["NN"]);
    }

    #[test]
    fn test_split_tagged_missing_tag() {
        assert!(matches!(
            split_tagged("the_DT cat"),
            Err(TaggerError::MissingTag(t)) if t == "cat"
        ));
        assert!(split_tagged("cat_").is_err());
    }

    #[test]
    fn test_lookup_tagger_fallback() {
        let tagger = LookupTagger::new("NN").with_tag("the", "DT");
        let tokens = vec!["the".to_string(), "cat".to_string()];
        assert_eq!(tagger.tag(&tokens).unwrap(), vec!["DT", "NN"]);
    }
}
