//! Merge-replay encoding.
//!
//! Each word becomes its characters plus the end-of-word marker; then every
//! learned rule is replayed over it in training order. Characters never seen
//! during training simply stay single-character symbols.

use crate::core::merges::MergeTable;
use crate::core::symbol::{word_symbols, Symbol};
use crate::split::{Piece, WordSplitter};
use ahash::AHashMap;

/// Encoder applying a [`MergeTable`] to arbitrary text.
#[derive(Debug, Clone)]
pub struct MergeReplayEncoder<'a> {
    merges: &'a MergeTable,
    splitter: &'a WordSplitter,
}

impl<'a> MergeReplayEncoder<'a> {
    /// Create an encoder borrowing a merge table and a splitter.
    pub fn new(merges: &'a MergeTable, splitter: &'a WordSplitter) -> Self {
        Self { merges, splitter }
    }

    /// Encode a single word (without the special-token check).
    pub fn encode_word(&self, word: &str) -> Vec<Symbol> {
        self.merges.replay(word_symbols(word))
    }

    /// Encode text into symbols.
    pub fn encode(&self, text: &str) -> Vec<Symbol> {
        let text = self.splitter.expand_markers(text);
        let pieces = self.splitter.split(&text);

        // Repeated words are replayed once.
        let mut cache: AHashMap<&str, Vec<Symbol>> = AHashMap::new();
        let mut symbols = Vec::with_capacity(text.len());
        for piece in pieces {
            match piece {
                Piece::Special(literal) => symbols.push(Symbol::new(literal)),
                Piece::Word(word) => {
                    let encoded = cache
                        .entry(word)
                        .or_insert_with(|| self.encode_word(word));
                    symbols.extend(encoded.iter().cloned());
                }
            }
        }
        symbols
    }
}
