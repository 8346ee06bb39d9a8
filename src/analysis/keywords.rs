//! Watch-list keyword hits.
//!
//! Matching is on whole words of the raw text, not on the filtered term
//! stream, so short watch-list entries such as `pm` still match.

use crate::models::KeywordHit;

/// Keywords to look for in every submission, in reporting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordWatchList {
    keywords: Vec<Vec<String>>,
}

/// Lowercase `text` and split it on everything outside `a-z`.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_lowercase())
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

impl KeywordWatchList {
    /// Build a watch list. Entries are normalized like the text they are
    /// matched against; blank and repeated entries are dropped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<Vec<String>> = Vec::new();
        for keyword in keywords {
            let phrase = words(keyword.as_ref());
            if !phrase.is_empty() && !normalized.contains(&phrase) {
                normalized.push(phrase);
            }
        }
        Self {
            keywords: normalized,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Watch-list keywords found in `text`, with their occurrence counts.
    pub fn hits(&self, text: &str) -> Vec<KeywordHit> {
        if self.keywords.is_empty() {
            return Vec::new();
        }

        let words = words(text);
        self.keywords
            .iter()
            .filter_map(|phrase| {
                let count = words
                    .windows(phrase.len())
                    .filter(|window| *window == phrase.as_slice())
                    .count();
                (count > 0).then(|| KeywordHit {
                    keyword: phrase.join(" "),
                    count,
                })
            })
            .collect()
    }
}
