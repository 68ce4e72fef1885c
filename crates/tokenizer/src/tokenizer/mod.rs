//! Main tokenizer implementation.
//!
//! This module provides the high-level `Tokenizer` struct that owns the
//! vocabulary, the ordered merge table and the special tokens, and drives
//! training, encoding, decoding and persistence.

use crate::io::{LoadedTokenizer, TokenizerLoader, TokenizerSaver};
use log::info;
use pairwise_core::{
    Decoder, MergeReplayEncoder, MergeTable, Result, SpecialTokens, Symbol, TokenIdMap,
    VocabStats, Vocabulary, WordSplitter,
};
use pairwise_training::{BpeTrainer, TrainOutcome, TrainingConfig};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Configuration for building a tokenizer.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Target vocabulary size
    pub vocab_size: usize,
    /// Run pair counting and merging on rayon's pool
    pub parallel: bool,
    /// Special tokens configuration
    pub special_tokens: SpecialTokens,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        let training = TrainingConfig::default();
        Self {
            vocab_size: training.vocab_size,
            parallel: training.parallel,
            special_tokens: SpecialTokens::default(),
        }
    }
}

/// Builder for creating a tokenizer.
#[derive(Clone, Default)]
pub struct TokenizerBuilder {
    config: TokenizerConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl TokenizerBuilder {
    /// Create a new tokenizer builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target vocabulary size.
    pub fn vocab_size(mut self, size: usize) -> Self {
        self.config.vocab_size = size;
        self
    }

    /// Enable or disable parallel training.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Set special tokens.
    pub fn with_special_tokens(mut self, tokens: SpecialTokens) -> Self {
        self.config.special_tokens = tokens;
        self
    }

    /// Let training stop at the next merge once `flag` is set.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Build an untrained tokenizer.
    pub fn build(self) -> Result<Tokenizer> {
        let mut tokenizer = Tokenizer::new(self.config)?;
        tokenizer.cancel = self.cancel;
        Ok(tokenizer)
    }
}

/// Main tokenizer struct.
///
/// An untrained tokenizer knows only its special tokens and the end-of-word
/// marker; every word then encodes to single characters.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Vocabulary
    vocab: Vocabulary,
    /// Merge rules in training order
    merges: MergeTable,
    /// Configuration
    config: TokenizerConfig,
    /// Special-token aware word splitter
    splitter: WordSplitter,
    /// Sorted token <-> id map
    id_map: TokenIdMap,
    cancel: Option<Arc<AtomicBool>>,
}

impl Tokenizer {
    /// Create a new tokenizer with the given configuration.
    pub fn new(config: TokenizerConfig) -> Result<Self> {
        let vocab = Vocabulary::base(&config.special_tokens, std::iter::empty());
        Self::from_parts(vocab, MergeTable::new(), config)
    }

    /// Create a tokenizer builder.
    pub fn builder() -> TokenizerBuilder {
        TokenizerBuilder::new()
    }

    fn from_parts(vocab: Vocabulary, merges: MergeTable, config: TokenizerConfig) -> Result<Self> {
        config.special_tokens.validate()?;
        let splitter = WordSplitter::new(&config.special_tokens)?;
        let id_map = TokenIdMap::new(&vocab, &config.special_tokens.unk)?;
        Ok(Self {
            vocab,
            merges,
            config,
            splitter,
            id_map,
            cancel: None,
        })
    }

    fn trainer(&self) -> Result<BpeTrainer> {
        let trainer = BpeTrainer::new(
            TrainingConfig {
                vocab_size: self.config.vocab_size,
                parallel: self.config.parallel,
            },
            self.config.special_tokens.clone(),
        )?;
        Ok(match &self.cancel {
            Some(flag) => trainer.with_cancel_flag(flag.clone()),
            None => trainer,
        })
    }

    /// Train the tokenizer on text data.
    ///
    /// On success the previous vocabulary and merges are replaced; on error
    /// the tokenizer is left unchanged.
    pub fn train(&mut self, data: &str) -> Result<TrainOutcome> {
        let outcome = self.trainer()?.train(data)?;
        self.install(&outcome)?;
        Ok(outcome)
    }

    /// Train the tokenizer on a corpus file.
    pub fn train_file(&mut self, path: &Path) -> Result<TrainOutcome> {
        let outcome = self.trainer()?.train_file(path)?;
        self.install(&outcome)?;
        Ok(outcome)
    }

    fn install(&mut self, outcome: &TrainOutcome) -> Result<()> {
        let id_map = TokenIdMap::new(&outcome.vocab, &self.config.special_tokens.unk)?;
        self.vocab = outcome.vocab.clone();
        self.merges = outcome.merges.clone();
        self.id_map = id_map;
        Ok(())
    }

    /// Encode text to symbols.
    pub fn encode(&self, text: &str) -> Vec<Symbol> {
        MergeReplayEncoder::new(&self.merges, &self.splitter).encode(text)
    }

    /// Decode symbols back to text.
    pub fn decode<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        Decoder::new(&self.config.special_tokens).decode(tokens)
    }

    /// Map tokens to ids; unknown tokens get the unknown-token id.
    pub fn token_to_id<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        self.id_map.token_to_id(tokens)
    }

    /// Map ids to tokens; out-of-range ids give the unknown token.
    pub fn id_to_token(&self, ids: &[u32]) -> Vec<Symbol> {
        self.id_map.id_to_token(ids)
    }

    /// Encode text straight to ids.
    pub fn encode_ids(&self, text: &str) -> Vec<u32> {
        self.token_to_id(&self.encode(text))
    }

    /// Decode ids straight to text.
    pub fn decode_ids(&self, ids: &[u32]) -> String {
        self.decode(&self.id_to_token(ids))
    }

    /// Get the vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Get the configured target vocabulary size.
    pub fn target_vocab_size(&self) -> usize {
        self.config.vocab_size
    }

    /// Get a reference to the vocabulary.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Get the merge rules in training order.
    pub fn merges(&self) -> &MergeTable {
        &self.merges
    }

    /// Get the special tokens.
    pub fn special_tokens(&self) -> &SpecialTokens {
        &self.config.special_tokens
    }

    /// Get the token <-> id map.
    pub fn id_map(&self) -> &TokenIdMap {
        &self.id_map
    }

    /// Vocabulary breakdown by token kind.
    pub fn stats(&self) -> VocabStats {
        self.vocab.stats(&self.config.special_tokens)
    }

    /// Save the tokenizer to a directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        TokenizerSaver::new(
            &self.vocab,
            &self.merges,
            &self.config.special_tokens,
            self.config.vocab_size,
        )
        .save(path)
    }

    /// Load a tokenizer from a directory.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_loaded(TokenizerLoader::load(path)?)
    }

    /// Load a tokenizer from a JSON artifact string.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_loaded(TokenizerLoader::from_json(json)?)
    }

    fn from_loaded(loaded: LoadedTokenizer) -> Result<Self> {
        let LoadedTokenizer {
            vocab,
            merges,
            special,
            vocab_size,
        } = loaded;
        let config = TokenizerConfig {
            vocab_size,
            special_tokens: special,
            ..Default::default()
        };
        let tokenizer = Self::from_parts(vocab, merges, config)?;
        info!(
            "Tokenizer ready: {} tokens, {} merges",
            tokenizer.vocab.len(),
            tokenizer.merges.len()
        );
        Ok(tokenizer)
    }
}

impl std::str::FromStr for Tokenizer {
    type Err = pairwise_core::TokenizerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairwise_core::{TokenizerError, END_OF_WORD};
    use pairwise_training::StopReason;

    fn fixture_corpus() -> String {
        let mut text = String::new();
        for (word, count) in [("low", 5), ("lowest", 2), ("newer", 6), ("wider", 3)] {
            for _ in 0..count {
                text.push_str(word);
                text.push(' ');
            }
        }
        text
    }

    fn trained(vocab_size: usize) -> Tokenizer {
        let mut tokenizer = Tokenizer::builder().vocab_size(vocab_size).build().unwrap();
        tokenizer.train(&fixture_corpus()).unwrap();
        tokenizer
    }

    #[test]
    fn test_tokenizer_creation() {
        let tokenizer = Tokenizer::builder().vocab_size(1000).build().unwrap();
        assert_eq!(tokenizer.target_vocab_size(), 1000);
        assert_eq!(tokenizer.vocab_size(), 7);
        assert!(tokenizer.merges().is_empty());
    }

    #[test]
    fn test_untrained_encodes_characters() {
        let tokenizer = Tokenizer::builder().build().unwrap();
        let tokens = tokenizer.encode("ab");
        assert_eq!(tokens, vec!["a", "b", END_OF_WORD]);

        let unk = tokenizer.id_map().unk_id();
        let ids = tokenizer.token_to_id(&tokens);
        assert_eq!(ids[0], unk);
        assert_eq!(ids[1], unk);
        assert_ne!(ids[2], unk);
    }

    #[test]
    fn test_train_fixture() {
        let tokenizer = trained(20);
        let merged: Vec<&str> = tokenizer
            .merges()
            .iter()
            .map(|r| r.merged.as_str())
            .collect();
        assert_eq!(merged, vec!["er", "er</w>", "lo"]);
        assert_eq!(tokenizer.vocab_size(), 20);
    }

    #[test]
    fn test_encode_decode() {
        let tokenizer = trained(30);
        let tokens = tokenizer.encode("lower newer");
        assert_eq!(tokenizer.decode(&tokens), "lower newer");

        let ids = tokenizer.encode_ids("low <EOS> wider");
        assert_eq!(tokenizer.decode_ids(&ids), "low wider");
    }

    #[test]
    fn test_unknown_characters() {
        let tokenizer = trained(20);
        let ids = tokenizer.encode_ids("zzz");
        let unk = tokenizer.id_map().unk_id();
        assert_eq!(&ids[..3], &[unk, unk, unk]);
        assert_eq!(tokenizer.id_to_token(&[u32::MAX]), vec!["<UNK>"]);
    }

    #[test]
    fn test_stats() {
        let tokenizer = trained(20);
        let stats = tokenizer.stats();
        assert_eq!(stats.total, 20);
        assert_eq!(stats.special, 6);
        assert_eq!(stats.characters, 11);
        assert_eq!(stats.subwords, 3);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tokenizer = trained(25);
        let dir = tempfile::tempdir().unwrap();

        tokenizer.save(dir.path()).unwrap();
        let loaded = Tokenizer::load(dir.path()).unwrap();

        assert_eq!(loaded.merges(), tokenizer.merges());
        assert_eq!(loaded.vocab(), tokenizer.vocab());
        assert_eq!(loaded.target_vocab_size(), 25);
        assert_eq!(loaded.id_map().tokens(), tokenizer.id_map().tokens());

        let text = "lowest newer wider";
        assert_eq!(loaded.encode_ids(text), tokenizer.encode_ids(text));
    }

    #[test]
    fn test_cancelled_training_keeps_state() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut tokenizer = Tokenizer::builder()
            .vocab_size(50)
            .cancel_flag(flag)
            .build()
            .unwrap();

        let err = tokenizer.train(&fixture_corpus()).unwrap_err();
        assert!(matches!(err, TokenizerError::Cancelled { .. }));
        assert!(tokenizer.merges().is_empty());
        assert_eq!(tokenizer.vocab_size(), 7);
    }

    #[test]
    fn test_train_reports_outcome() {
        let mut tokenizer = Tokenizer::builder().vocab_size(1000).build().unwrap();
        let outcome = tokenizer.train("ab ab").unwrap();
        assert_eq!(outcome.stop, StopReason::PairsExhausted);
        assert_eq!(outcome.frequencies.len(), outcome.merges.len());
    }

    #[test]
    fn test_extra_special_token() {
        let special = SpecialTokens::default().with_extra("<SEP>");
        let mut tokenizer = Tokenizer::builder()
            .vocab_size(40)
            .with_special_tokens(special)
            .build()
            .unwrap();
        tokenizer.train("a<SEP>b a b").unwrap();

        let tokens = tokenizer.encode("a <SEP>");
        assert!(tokens.iter().any(|t| t == "<SEP>"));
        assert!(tokenizer.vocab().contains("<SEP>"));
    }
}
