//! Word frequency extraction.
//!
//! The corpus is reduced to its distinct words, each held as a symbol
//! sequence ending in the end-of-word marker, with an occurrence count.
//! Special tokens are atomic and never take part in merging, so they are
//! counted separately and kept out of the table.

use ahash::{AHashMap, AHashSet};
use pairwise_core::{
    contains_pair, merge_pair, word_symbols, MergeRule, Piece, SpecialTokens, Symbol, Vocabulary,
    WordSplitter,
};
use std::collections::BTreeMap;

/// Distinct words and their counts, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordTable {
    /// Word -> symbol sequence
    words: Vec<Vec<Symbol>>,
    /// `counts[i]` is the number of occurrences of `words[i]`
    counts: Vec<u64>,
}

/// Result of reading a corpus.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Initial word table
    pub words: WordTable,
    /// Base vocabulary: specials, the end-of-word marker and every character
    pub vocab: Vocabulary,
    /// Occurrences of each special token literal
    pub special_counts: BTreeMap<String, u64>,
}

impl WordTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(word, count)` entries. Zero counts are dropped and
    /// repeated words are summed.
    pub fn from_counts<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut merged: AHashMap<&str, u64> = AHashMap::new();
        for (word, count) in entries {
            if count > 0 {
                *merged.entry(word).or_insert(0) += count;
            }
        }

        let mut sorted: Vec<(&str, u64)> = merged.into_iter().collect();
        sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut table = Self {
            words: Vec::with_capacity(sorted.len()),
            counts: Vec::with_capacity(sorted.len()),
        };
        for (word, count) in sorted {
            table.words.push(word_symbols(word));
            table.counts.push(count);
        }
        table
    }

    /// Get the number of distinct words.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Get a reference to the word representations.
    pub fn words(&self) -> &[Vec<Symbol>] {
        &self.words
    }

    /// Get a reference to the word counts.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Get the total count of all word occurrences.
    pub fn total_occurrences(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterate `(symbols, count)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&[Symbol], u64)> {
        self.words
            .iter()
            .map(Vec::as_slice)
            .zip(self.counts.iter().copied())
    }

    /// Upper bound on the merges this table can still absorb: each merge
    /// removes at least one symbol and a word never drops below one.
    pub fn merge_bound(&self) -> usize {
        self.words.iter().map(|w| w.len().saturating_sub(1)).sum()
    }

    /// Distinct symbols over all words.
    pub fn symbols(&self) -> AHashSet<&str> {
        self.words
            .iter()
            .flat_map(|w| w.iter().map(|s| s.as_str()))
            .collect()
    }

    /// Produce the table obtained by collapsing `rule`'s pair in every word.
    ///
    /// Counts are unchanged. Words that do not contain the pair are moved
    /// over untouched.
    pub fn apply_merge(self, rule: &MergeRule, parallel: bool) -> Self {
        let Self { words, counts } = self;
        let rewrite = |word: Vec<Symbol>| {
            if contains_pair(&word, &rule.pair) {
                merge_pair(&word, &rule.pair, &rule.merged)
            } else {
                word
            }
        };

        let words: Vec<Vec<Symbol>> = if parallel {
            use rayon::prelude::*;
            words.into_par_iter().map(rewrite).collect()
        } else {
            words.into_iter().map(rewrite).collect()
        };

        Self { words, counts }
    }
}

impl Extraction {
    /// Read a corpus: split it, count words and build the base vocabulary.
    pub fn from_text(text: &str, splitter: &WordSplitter, special: &SpecialTokens) -> Self {
        let text = splitter.expand_markers(text);

        let mut word_counts: AHashMap<&str, u64> = AHashMap::new();
        let mut special_counts: BTreeMap<String, u64> = BTreeMap::new();
        for piece in splitter.split(&text) {
            match piece {
                Piece::Word(word) => *word_counts.entry(word).or_insert(0) += 1,
                Piece::Special(literal) => {
                    *special_counts.entry(literal.to_string()).or_insert(0) += 1
                }
            }
        }

        let words = WordTable::from_counts(word_counts);
        Self::from_table(words, special, special_counts)
    }

    /// Wrap an existing table, deriving the base vocabulary from it.
    pub fn from_table(
        words: WordTable,
        special: &SpecialTokens,
        special_counts: BTreeMap<String, u64>,
    ) -> Self {
        let vocab = Vocabulary::base(special, words.symbols());
        Self {
            words,
            vocab,
            special_counts,
        }
    }
}
