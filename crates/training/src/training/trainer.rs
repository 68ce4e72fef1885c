//! BPE trainer implementation.
//!
//! Training runs as a small state machine:
//!
//! - `Init`: extract words, fix the base vocabulary, compute the number of
//!   merges still needed to reach the target size;
//! - `Merging`: count pairs, select the best, merge it everywhere, record the
//!   rule, until the target is met or no pair is left;
//! - `Done`: hand back the vocabulary and the ordered merge table.

use super::counter::PairCounter;
use super::words::{Extraction, WordTable};
use log::{debug, info, warn};
use pairwise_core::{
    select_best, MergeRule, MergeTable, Result, SpecialTokens, TokenizerError, Vocabulary,
    WordSplitter,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Configuration for BPE training.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Target vocabulary size, counting special tokens and base characters
    pub vocab_size: usize,
    /// Whether to count pairs and apply merges on rayon's pool
    pub parallel: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vocab_size: 250,
            parallel: false,
        }
    }
}

/// Why the merge loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of merges was performed (possibly zero)
    TargetReached,
    /// No adjacent pair was left before the target was met
    PairsExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrainState {
    Init,
    Merging,
    Done(StopReason),
}

/// Everything produced by a training run.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    /// Final vocabulary
    pub vocab: Vocabulary,
    /// Learned rules, in training order
    pub merges: MergeTable,
    /// `frequencies[i]` is the corpus frequency of rule `i` when it was chosen
    pub frequencies: Vec<u64>,
    /// Vocabulary size after extraction
    pub base_size: usize,
    /// Number of merges that were requested
    pub target_merges: usize,
    /// How the run ended
    pub stop: StopReason,
    /// Occurrences of each special token in the corpus
    pub special_counts: BTreeMap<String, u64>,
}

/// BPE trainer.
///
/// Trains a BPE tokenizer from text data by iteratively merging the most
/// frequent adjacent symbol pair.
#[derive(Debug, Clone)]
pub struct BpeTrainer {
    config: TrainingConfig,
    special: SpecialTokens,
    splitter: WordSplitter,
    cancel: Option<Arc<AtomicBool>>,
}

impl BpeTrainer {
    /// Create a new BPE trainer with the given configuration.
    pub fn new(config: TrainingConfig, special: SpecialTokens) -> Result<Self> {
        special.validate()?;
        let splitter = WordSplitter::new(&special)?;
        Ok(Self {
            config,
            special,
            splitter,
            cancel: None,
        })
    }

    /// Create a trainer with default special tokens and sequential counting.
    pub fn with_vocab_size(vocab_size: usize) -> Result<Self> {
        Self::new(
            TrainingConfig {
                vocab_size,
                ..Default::default()
            },
            SpecialTokens::default(),
        )
    }

    /// Stop at the next merge boundary once `flag` becomes `true`.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Get the special tokens.
    pub fn special_tokens(&self) -> &SpecialTokens {
        &self.special
    }

    /// Train on a corpus file.
    ///
    /// A missing or unreadable file is a configuration error raised before
    /// any training work.
    pub fn train_file(&self, path: &Path) -> Result<TrainOutcome> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TokenizerError::InvalidConfig(format!(
                "Cannot read corpus {}: {}",
                path.display(),
                e
            ))
        })?;
        info!("Read corpus {} ({} bytes)", path.display(), text.len());
        self.train(&text)
    }

    /// Train on in-memory text.
    pub fn train(&self, text: &str) -> Result<TrainOutcome> {
        let extraction = Extraction::from_text(text, &self.splitter, &self.special);
        self.train_extraction(extraction)
    }

    /// Train on pre-counted words.
    pub fn train_word_counts<'a, I>(&self, counts: I) -> Result<TrainOutcome>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let words = WordTable::from_counts(counts);
        let extraction = Extraction::from_table(words, &self.special, BTreeMap::new());
        self.train_extraction(extraction)
    }

    /// Run the merge loop over an extraction.
    pub fn train_extraction(&self, extraction: Extraction) -> Result<TrainOutcome> {
        let mut state = TrainState::Init;
        debug!("Training state: {:?}", state);

        let Extraction {
            mut words,
            mut vocab,
            special_counts,
        } = extraction;
        let base_size = vocab.base_size();
        let target_merges = self.config.vocab_size.saturating_sub(base_size);
        info!(
            "Base vocabulary: {} tokens from {} distinct words ({} occurrences); {} merges to reach {}",
            base_size,
            words.len(),
            words.total_occurrences(),
            target_merges,
            self.config.vocab_size
        );

        let counter = PairCounter::new(self.config.parallel);
        // The target can be far beyond what the corpus supports.
        let capacity = target_merges.min(words.merge_bound());
        let mut merges = MergeTable::with_capacity(capacity);
        let mut frequencies = Vec::with_capacity(capacity);
        let mut last_log_percent = 0;

        state = if target_merges == 0 {
            TrainState::Done(StopReason::TargetReached)
        } else {
            TrainState::Merging
        };

        while state == TrainState::Merging {
            self.check_cancelled(merges.len())?;

            let pair_counts = counter.count(&words);
            let Some(best) = select_best(&pair_counts) else {
                state = TrainState::Done(StopReason::PairsExhausted);
                break;
            };
            let frequency = best.count;
            let rule = MergeRule::new(best.pair.0.clone(), best.pair.1.clone());
            drop(pair_counts);

            words = words.apply_merge(&rule, self.config.parallel);
            if !vocab.insert(&rule.merged) {
                warn!(
                    "Merged token {:?} was already in the vocabulary",
                    rule.merged
                );
            }
            debug!(
                "Merge {}/{}: '{}' + '{}' -> '{}' [freq: {}]",
                merges.len() + 1,
                target_merges,
                rule.left(),
                rule.right(),
                rule.merged,
                frequency
            );
            merges.push(rule);
            frequencies.push(frequency);

            let percent = merges.len() * 100 / target_merges;
            if percent >= last_log_percent + 10 {
                last_log_percent = percent - percent % 10;
                info!(
                    "Progress: {}% ({}/{} merges)",
                    percent,
                    merges.len(),
                    target_merges
                );
            }

            if merges.len() == target_merges {
                state = TrainState::Done(StopReason::TargetReached);
            }
        }

        let TrainState::Done(stop) = state else {
            return Err(TokenizerError::Training(format!(
                "Merge loop left in state {state:?}"
            )));
        };
        match stop {
            StopReason::TargetReached => info!(
                "Training complete: {} merges, vocabulary size {}",
                merges.len(),
                vocab.len()
            ),
            StopReason::PairsExhausted => info!(
                "No more pairs to merge; stopping at {} merges, vocabulary size {} (target {})",
                merges.len(),
                vocab.len(),
                self.config.vocab_size
            ),
        }

        Ok(TrainOutcome {
            vocab,
            merges,
            frequencies,
            base_size,
            target_merges,
            stop,
            special_counts,
        })
    }

    fn check_cancelled(&self, merges: usize) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => {
                warn!("Training cancelled after {} merges", merges);
                Err(TokenizerError::Cancelled { merges })
            }
            _ => Ok(()),
        }
    }
}
