//! Top-N term selection.

use super::frequency::FrequencyTable;
use crate::models::RankedTerm;
use std::collections::HashMap;

/// Number of terms kept for display unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 10;

/// Upper bound on ranked terms, whatever `n` is asked for.
pub const MAX_TOP_N: usize = 10;

/// Rank the terms of `table` by descending count and keep the first `n`
/// (at most [`MAX_TOP_N`]).
///
/// Equal counts are ordered by first appearance in `order`. Terms present in
/// the table but missing from `order` sort after every term that appears.
pub fn top_terms<S: AsRef<str>>(
    table: &FrequencyTable,
    order: &[S],
    n: usize,
) -> Vec<RankedTerm> {
    let mut first_seen: HashMap<&str, usize> = HashMap::with_capacity(table.len());
    for (index, token) in order.iter().enumerate() {
        first_seen.entry(token.as_ref()).or_insert(index);
    }

    let mut entries: Vec<(&str, usize, usize)> = table
        .iter()
        .map(|(term, count)| {
            let seen = first_seen.get(term).copied().unwrap_or(usize::MAX);
            (term, count, seen)
        })
        .collect();

    // Term text is the last key so the result never depends on hash order.
    entries.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.2.cmp(&b.2))
            .then_with(|| a.0.cmp(b.0))
    });
    entries.truncate(n.min(MAX_TOP_N));

    entries
        .into_iter()
        .enumerate()
        .map(|(rank, (term, count, _))| RankedTerm {
            term: term.to_string(),
            count,
            rank,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(tokens: &[&str]) -> Vec<RankedTerm> {
        top_terms(&FrequencyTable::count(tokens), tokens, DEFAULT_TOP_N)
    }

    #[test]
    fn test_round_trip_ranking() {
        let ranked = rank(&["fake", "fake", "news", "news", "news", "propaganda"]);
        let view: Vec<(&str, usize, usize)> = ranked
            .iter()
            .map(|r| (r.term.as_str(), r.count, r.rank))
            .collect();

        assert_eq!(
            view,
            vec![("news", 3, 0), ("fake", 2, 1), ("propaganda", 1, 2)]
        );
    }

    #[test]
    fn test_ties_follow_first_occurrence() {
        let ranked = rank(&["zeta", "alpha", "mid", "alpha", "zeta", "mid"]);
        let terms: Vec<&str> = ranked.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(terms, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_truncates_to_n() {
        let words: Vec<String> = (0..15)
            .map(|i| format!("word{}", (b'a' + i as u8) as char))
            .collect();
        // The first word appears 15 times, the second 14, and so on.
        let mut tokens = Vec::new();
        for (i, word) in words.iter().enumerate() {
            for _ in 0..(15 - i) {
                tokens.push(word.as_str());
            }
        }

        let ranked = top_terms(&FrequencyTable::count(&tokens), &tokens, DEFAULT_TOP_N);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].term, words[0]);
        assert_eq!(ranked[9].term, words[9]);
        assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(ranked.iter().enumerate().all(|(i, r)| r.rank == i));
    }

    #[test]
    fn test_fewer_than_n() {
        let ranked = rank(&["solo", "duo", "duo"]);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_empty() {
        let ranked = rank(&[]);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let tokens = ["bbb", "aaa", "ccc", "aaa", "bbb", "ddd", "eee"];
        let first = rank(&tokens);
        for _ in 0..20 {
            assert_eq!(rank(&tokens), first);
        }
    }

    #[test]
    fn test_terms_missing_from_order_rank_last_among_equals() {
        let table = FrequencyTable::from_pairs(vec![
            ("orphan".to_string(), 2),
            ("listed".to_string(), 2),
        ]);
        let ranked = top_terms(&table, &["listed"], DEFAULT_TOP_N);
        assert_eq!(ranked[0].term, "listed");
        assert_eq!(ranked[1].term, "orphan");
    }

    #[test]
    fn test_never_more_than_ten() {
        let words = [
            "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
            "juliet", "kilo", "lima", "mike", "november", "oscar",
        ];
        let ranked = top_terms(&FrequencyTable::count(&words), &words, 15);

        assert_eq!(ranked.len(), MAX_TOP_N);
        assert_eq!(ranked[9].term, "juliet");
    }
}
