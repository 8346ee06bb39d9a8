//! Sources of term counts.
//!
//! Ranking and layout only need a frequency table plus an occurrence order
//! for tie-breaking. Locally tokenized text and the word list returned by the
//! classification service both provide those, so the rest of the pipeline
//! does not care where the terms came from.

use super::frequency::FrequencyTable;
use super::ranking::top_terms;
use crate::models::{RankedTerm, TermOrigin};

/// Anything that can feed the top-N selector.
pub trait TermSource {
    fn origin(&self) -> TermOrigin;

    fn frequencies(&self) -> FrequencyTable;

    /// Terms in first-occurrence order; repeats are allowed.
    fn occurrence_order(&self) -> Vec<&str>;

    /// Rank this source's terms, keeping at most `n`.
    fn rank(&self, n: usize) -> Vec<RankedTerm> {
        top_terms(&self.frequencies(), &self.occurrence_order(), n)
    }
}

/// Terms tokenized from the submitted text.
#[derive(Debug, Clone, Default)]
pub struct LocalTerms {
    tokens: Vec<String>,
}

impl LocalTerms {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl TermSource for LocalTerms {
    fn origin(&self) -> TermOrigin {
        TermOrigin::Local
    }

    fn frequencies(&self) -> FrequencyTable {
        FrequencyTable::count(&self.tokens)
    }

    fn occurrence_order(&self) -> Vec<&str> {
        self.tokens.iter().map(String::as_str).collect()
    }
}

/// Term counts supplied by the classification service, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceTerms {
    words: Vec<(String, usize)>,
}

impl ServiceTerms {
    pub fn new(words: Vec<(String, usize)>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[(String, usize)] {
        &self.words
    }
}

impl TermSource for ServiceTerms {
    fn origin(&self) -> TermOrigin {
        TermOrigin::Service
    }

    fn frequencies(&self) -> FrequencyTable {
        FrequencyTable::from_pairs(self.words.iter().cloned())
    }

    fn occurrence_order(&self) -> Vec<&str> {
        self.words.iter().map(|(term, _)| term.as_str()).collect()
    }
}
