//! Pairwise-tokenizer - High-level tokenizer API
//!
//! This crate provides a user-friendly interface for classic BPE
//! tokenization, integrating all components (vocabulary, merge table,
//! trainer, encoder, decoder) into a single API.
//!
//! # Features
//!
//! - Builder pattern for tokenizer configuration
//! - Training from text or a corpus file, with cooperative cancellation
//! - Atomic special tokens for document structure
//! - Deterministic token ids derived from the sorted vocabulary
//! - Saving and loading a JSON artifact with integrity checks
//!
//! # Example
//!
//! ```rust
//! use pairwise_tokenizer::Tokenizer;
//!
//! // Build a tokenizer with configuration
//! let mut tokenizer = Tokenizer::builder().vocab_size(40).build()?;
//! tokenizer.train("low low lower newer newest wider")?;
//!
//! // Encode text
//! let tokens = tokenizer.encode("lower");
//! let ids = tokenizer.token_to_id(&tokens);
//!
//! // Decode tokens
//! let text = tokenizer.decode(&tokenizer.id_to_token(&ids));
//! assert_eq!(text, "lower");
//! # Ok::<(), pairwise_tokenizer::TokenizerError>(())
//! ```

// Re-export core types
pub use pairwise_core::{
    MergeRule, MergeTable, Result, SpecialTokens, Symbol, TokenizerError, VocabStats, Vocabulary,
    END_OF_WORD,
};
pub use pairwise_training::{StopReason, TrainOutcome};

// Tokenizer API
pub mod tokenizer;
pub use tokenizer::{Tokenizer, TokenizerBuilder, TokenizerConfig};

// IO/Serialization
pub mod io;
pub use io::{SerializedTokenizer, TokenizerLoader, TokenizerSaver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
