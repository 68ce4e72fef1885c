//! Merge candidate ordering.
//!
//! Selection is by frequency first; among equally frequent pairs the one
//! that sorts first lexicographically (left symbol, then right symbol, by
//! code point) wins. Hash iteration order never influences the outcome.

use super::symbol::Pair;
use std::cmp::Ordering;

/// A merge candidate during BPE training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCandidate<'a> {
    /// The pair of symbols to merge
    pub pair: &'a Pair,
    /// The aggregated frequency of this pair
    pub count: u64,
}

impl<'a> MergeCandidate<'a> {
    /// Create a new merge candidate.
    pub fn new(pair: &'a Pair, count: u64) -> Self {
        Self { pair, count }
    }
}

// Greater = better: higher count, then lexicographically smaller pair.
impl Ord for MergeCandidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.pair.cmp(self.pair))
    }
}

impl PartialOrd for MergeCandidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pick the best pair out of `(pair, count)` entries.
///
/// Returns `None` when there are no entries; that is the normal signal that
/// no merge is available.
pub fn select_best<'a, I>(counts: I) -> Option<MergeCandidate<'a>>
where
    I: IntoIterator<Item = (&'a Pair, &'a u64)>,
{
    counts
        .into_iter()
        .map(|(pair, &count)| MergeCandidate::new(pair, count))
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbol::Symbol;
    use ahash::AHashMap;

    fn pair(a: &str, b: &str) -> Pair {
        (Symbol::new(a), Symbol::new(b))
    }

    #[test]
    fn test_highest_count_wins() {
        let mut counts: AHashMap<Pair, u64> = AHashMap::new();
        counts.insert(pair("a", "b"), 3);
        counts.insert(pair("c", "d"), 7);
        counts.insert(pair("e", "f"), 5);

        let best = select_best(&counts).unwrap();
        assert_eq!(best.pair, &pair("c", "d"));
        assert_eq!(best.count, 7);
    }

    #[test]
    fn test_tie_break_is_lexicographic() {
        let mut counts: AHashMap<Pair, u64> = AHashMap::new();
        counts.insert(pair("r", "</w>"), 9);
        counts.insert(pair("e", "r"), 9);
        counts.insert(pair("w", "e"), 8);

        let best = select_best(&counts).unwrap();
        assert_eq!(best.pair, &pair("e", "r"));
    }

    #[test]
    fn test_tie_break_on_second_symbol() {
        let mut counts: AHashMap<Pair, u64> = AHashMap::new();
        counts.insert(pair("a", "z"), 2);
        counts.insert(pair("a", "b"), 2);

        assert_eq!(select_best(&counts).unwrap().pair, &pair("a", "b"));
    }

    #[test]
    fn test_tie_break_independent_of_insertion_order() {
        let pairs = [pair("o", "w"), pair("l", "o"), pair("w", "</w>")];

        let forward: AHashMap<Pair, u64> = pairs.iter().cloned().map(|p| (p, 7)).collect();
        let backward: AHashMap<Pair, u64> = pairs.iter().rev().cloned().map(|p| (p, 7)).collect();

        assert_eq!(select_best(&forward).unwrap().pair, &pair("l", "o"));
        assert_eq!(select_best(&backward).unwrap().pair, &pair("l", "o"));
    }

    #[test]
    fn test_empty_counts() {
        let counts: AHashMap<Pair, u64> = AHashMap::new();
        assert!(select_best(&counts).is_none());
    }

    #[test]
    fn test_candidate_ordering() {
        let ab = pair("a", "b");
        let bc = pair("b", "c");

        assert!(MergeCandidate::new(&ab, 2) > MergeCandidate::new(&bc, 1));
        assert!(MergeCandidate::new(&ab, 2) > MergeCandidate::new(&bc, 2));
        assert!(MergeCandidate::new(&bc, 3) > MergeCandidate::new(&ab, 2));
    }
}
