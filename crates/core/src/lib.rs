//! Pairwise-core - Core classic BPE implementation
//!
//! This crate provides the data structures shared by training and inference:
//! symbols and word representations, the vocabulary and its deterministic
//! id map, the ordered merge table, the merge selector, and the merge-replay
//! encoder and decoder.
//!
//! # Example
//!
//! ```rust
//! use pairwise_core::{MergeReplayEncoder, MergeRule, MergeTable, SpecialTokens, WordSplitter};
//!
//! let merges: MergeTable = vec![MergeRule::new("e", "r"), MergeRule::new("l", "o")].into();
//! let splitter = WordSplitter::new(&SpecialTokens::default())?;
//! let encoder = MergeReplayEncoder::new(&merges, &splitter);
//!
//! let symbols = encoder.encode("lower");
//! assert_eq!(symbols, vec!["lo", "w", "er", "</w>"]);
//! # Ok::<(), pairwise_core::TokenizerError>(())
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

pub mod core;
pub use crate::core::{
    contains_pair, merge_pair, select_best, word_symbols, MergeCandidate, MergeRule, MergeTable,
    Pair, SpecialTokens, Symbol, TokenIdMap, VocabStats, Vocabulary, END_OF_WORD,
};

pub mod split;
pub use split::{Piece, WordSplitter};

pub mod encoding;
pub use encoding::{Decoder, MergeReplayEncoder};
