//! Core BPE data structures.
//!
//! Symbols, the vocabulary, the ordered merge table, merge selection and
//! the token-id map. Nothing here depends on how training is driven.

pub mod id_map;
pub mod merges;
pub mod priority;
pub mod symbol;
pub mod vocab;

pub use id_map::TokenIdMap;
pub use merges::{contains_pair, merge_pair, MergeRule, MergeTable};
pub use priority::{select_best, MergeCandidate};
pub use symbol::{word_symbols, Pair, Symbol, END_OF_WORD};
pub use vocab::{SpecialTokens, VocabStats, Vocabulary};
