//! Text normalization into candidate terms.

use std::collections::HashSet;

/// Shortest allowed term; shorter tokens are noise.
pub const DEFAULT_MIN_TERM_LEN: usize = 3;

/// True when `word` is a normalized term: lowercase ASCII letters only and
/// at least [`DEFAULT_MIN_TERM_LEN`] long.
pub fn is_term(word: &str) -> bool {
    word.len() >= DEFAULT_MIN_TERM_LEN && word.chars().all(|c| c.is_ascii_lowercase())
}

/// Splits raw text into lowercase alphabetic terms.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    min_len: usize,
    stopwords: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_TERM_LEN,
            stopwords: HashSet::new(),
        }
    }
}

impl Tokenizer {
    /// Create a tokenizer with a custom minimum length and stop list.
    ///
    /// `min_len` can raise the term length floor but never lower it below
    /// [`DEFAULT_MIN_TERM_LEN`]. Stop words are compared after
    /// normalization, so they are lowercased here once.
    pub fn new<I, S>(min_len: usize, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            min_len: min_len.max(DEFAULT_MIN_TERM_LEN),
            stopwords: stopwords
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Tokenize `text`, keeping source order and duplicates.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
            .collect();

        normalized
            .split_whitespace()
            .filter(|token| token.len() >= self.min_len)
            .filter(|token| !self.stopwords.contains(*token))
            .map(String::from)
            .collect()
    }
}
