//! Term occurrence counting.

use std::collections::HashMap;

/// Occurrence counts per term. Every stored count is at least one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Count every token in `tokens`.
    pub fn count<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();

        for token in tokens {
            *counts.entry(token.as_ref().to_string()).or_default() += 1;
        }

        Self { counts }
    }

    /// Build a table from already-aggregated pairs. Zero counts are dropped
    /// and repeated terms are summed.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, usize)>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();

        for (term, count) in pairs {
            if count > 0 {
                *counts.entry(term).or_default() += count;
            }
        }

        Self { counts }
    }

    #[allow(dead_code)] // Lookup utility
    pub fn get(&self, term: &str) -> Option<usize> {
        self.counts.get(term).copied()
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(term, count)| (term.as_str(), *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_round_trip_sentence() {
        let tokens = ["fake", "fake", "news", "news", "news", "propaganda"];
        let table = FrequencyTable::count(&tokens);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("fake"), Some(2));
        assert_eq!(table.get("news"), Some(3));
        assert_eq!(table.get("propaganda"), Some(1));
        assert_eq!(table.get("missing"), None);
    }

    #[test]
    fn test_total_matches_token_count() {
        let samples: [&[&str]; 4] = [
            &[],
            &["one"],
            &["aaa", "bbb", "aaa", "ccc", "bbb", "aaa"],
            &["same", "same", "same", "same"],
        ];

        for tokens in samples {
            let table = FrequencyTable::count(tokens);
            assert_eq!(table.total(), tokens.len());
            assert!(table.iter().all(|(_, count)| count > 0));
        }
    }

    #[test]
    fn test_order_does_not_change_counts() {
        let a = FrequencyTable::count(&["xyz", "abc", "xyz"]);
        let b = FrequencyTable::count(&["abc", "xyz", "xyz"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_pairs_drops_zero_and_merges() {
        let table = FrequencyTable::from_pairs(vec![
            ("hoax".to_string(), 4),
            ("ghost".to_string(), 0),
            ("hoax".to_string(), 1),
        ]);

        assert_eq!(table.get("hoax"), Some(5));
        assert_eq!(table.get("ghost"), None);
        assert_eq!(table.len(), 1);
    }
}
