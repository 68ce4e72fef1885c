//! Pair counting for BPE training.
//!
//! Every call rescans the whole word table. The parallel variant shards
//! words over rayon's pool and sums the partial maps, which gives exactly
//! the sequential totals.

use super::words::WordTable;
use ahash::AHashMap;
use pairwise_core::{Pair, Symbol};

/// Aggregated adjacent-pair frequencies.
pub type PairCounts = AHashMap<Pair, u64>;

/// Counter for BPE pair frequencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairCounter {
    parallel: bool,
}

impl PairCounter {
    /// Create a new pair counter.
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Count all pairs, sequentially or in parallel depending on the counter.
    pub fn count(&self, table: &WordTable) -> PairCounts {
        if self.parallel {
            count_pairs_parallel(table)
        } else {
            count_pairs_sequential(table)
        }
    }
}

fn add_word_pairs(pair_counts: &mut PairCounts, word: &[Symbol], count: u64) {
    for window in word.windows(2) {
        let pair = (window[0].clone(), window[1].clone());
        *pair_counts.entry(pair).or_insert(0) += count;
    }
}

/// Count all pairs sequentially.
pub fn count_pairs_sequential(table: &WordTable) -> PairCounts {
    let mut pair_counts = PairCounts::new();
    for (word, count) in table.iter() {
        add_word_pairs(&mut pair_counts, word, count);
    }
    pair_counts
}

/// Count all pairs in parallel.
pub fn count_pairs_parallel(table: &WordTable) -> PairCounts {
    use rayon::prelude::*;

    table
        .words()
        .par_iter()
        .zip(table.counts().par_iter())
        .fold(PairCounts::new, |mut acc, (word, &count)| {
            add_word_pairs(&mut acc, word, count);
            acc
        })
        .reduce(PairCounts::new, |mut acc, partial| {
            for (pair, count) in partial {
                *acc.entry(pair).or_insert(0) += count;
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str) -> Pair {
        (Symbol::new(a), Symbol::new(b))
    }

    #[test]
    fn test_count_pairs_sequential() {
        let table = WordTable::from_counts([("ab", 1), ("bc", 1)]);

        let pairs = count_pairs_sequential(&table);
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs.get(&pair("a", "b")), Some(&1));
        assert_eq!(pairs.get(&pair("b", "c")), Some(&1));
        assert_eq!(pairs.get(&pair("b", "</w>")), Some(&1));
        assert_eq!(pairs.get(&pair("c", "</w>")), Some(&1));
    }

    #[test]
    fn test_count_pairs_with_frequency() {
        let table = WordTable::from_counts([("ab", 3)]);

        let pairs = count_pairs_sequential(&table);
        assert_eq!(pairs.get(&pair("a", "b")), Some(&3));
        assert_eq!(pairs.get(&pair("b", "</w>")), Some(&3));
    }

    #[test]
    fn test_repeated_pair_within_word() {
        let table = WordTable::from_counts([("aaa", 2)]);

        let pairs = count_pairs_sequential(&table);
        assert_eq!(pairs.get(&pair("a", "a")), Some(&4));
    }

    #[test]
    fn test_fixture_totals() {
        let table =
            WordTable::from_counts([("low", 5), ("lowest", 2), ("newer", 6), ("wider", 3)]);

        let pairs = count_pairs_sequential(&table);
        assert_eq!(pairs.get(&pair("e", "r")), Some(&9));
        assert_eq!(pairs.get(&pair("r", "</w>")), Some(&9));
        assert_eq!(pairs.get(&pair("w", "e")), Some(&8));
        assert_eq!(pairs.get(&pair("l", "o")), Some(&7));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let words: Vec<String> = (0..200).map(|i| format!("w{}x{}", i % 17, i % 5)).collect();
        let table = WordTable::from_counts(
            words
                .iter()
                .enumerate()
                .map(|(i, w)| (w.as_str(), i as u64 % 7 + 1)),
        );

        assert_eq!(count_pairs_parallel(&table), count_pairs_sequential(&table));
        assert_eq!(
            PairCounter::new(true).count(&table),
            PairCounter::new(false).count(&table)
        );
    }

    #[test]
    fn test_empty_table() {
        let table = WordTable::new();
        assert!(count_pairs_sequential(&table).is_empty());
        assert!(count_pairs_parallel(&table).is_empty());
    }
}
