//! Pairwise-training - BPE training infrastructure
//!
//! This crate learns an ordered table of merge rules from raw text using the
//! classic greedy algorithm: every iteration recounts all adjacent symbol
//! pairs and merges the most frequent one.
//!
//! # Features
//!
//! - Word frequency extraction with atomic special tokens
//! - Pair frequency counting, sequential or on rayon's pool
//! - Deterministic tie-breaking and cooperative cancellation
//!
//! # Example
//!
//! ```rust
//! use pairwise_training::{BpeTrainer, StopReason};
//!
//! let trainer = BpeTrainer::with_vocab_size(20)?;
//! let outcome = trainer.train("low low lower newer")?;
//! assert!(outcome.merges.len() <= 20 - outcome.base_size);
//! assert!(matches!(
//!     outcome.stop,
//!     StopReason::TargetReached | StopReason::PairsExhausted
//! ));
//! # Ok::<(), pairwise_training::TokenizerError>(())
//! ```

pub use pairwise_core::{Result, TokenizerError};

// Training infrastructure
pub mod training;
pub use training::{
    BpeTrainer, Extraction, PairCounter, PairCounts, StopReason, TrainOutcome, TrainingConfig,
    WordTable,
};
