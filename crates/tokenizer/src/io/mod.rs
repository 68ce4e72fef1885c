//! Serialization and deserialization for trained tokenizers.
//!
//! This module saves a tokenizer as a JSON artifact with two plain-text
//! listings next to it, and loads the artifact back with integrity checks.

pub mod format;
pub mod load;
pub mod save;

pub use format::{SerializedTokenizer, MERGES_FILE, TOKENIZER_FILE, VOCAB_FILE};
pub use load::{LoadedTokenizer, TokenizerLoader};
pub use save::TokenizerSaver;
