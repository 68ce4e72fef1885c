//! Training infrastructure for BPE tokenizers.
//!
//! This module provides word extraction, pair counting and the merge loop
//! that learns BPE merge rules from text data.

pub mod counter;
pub mod trainer;
pub mod words;

pub use counter::{count_pairs_parallel, count_pairs_sequential, PairCounter, PairCounts};
pub use trainer::{BpeTrainer, StopReason, TrainOutcome, TrainingConfig};
pub use words::{Extraction, WordTable};
