//! Deterministic token <-> id mapping.
//!
//! Ids are positions in the code-point-sorted vocabulary, so the same
//! vocabulary yields the same map in every process.

use super::symbol::Symbol;
use super::vocab::Vocabulary;
use crate::error::{Result, TokenizerError};
use ahash::AHashMap;

/// Bijection between a vocabulary and `0..len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdMap {
    /// Id -> token
    tokens: Vec<Symbol>,
    /// Token -> id
    ids: AHashMap<Symbol, u32>,
    /// Id returned for tokens outside the vocabulary
    unk_id: u32,
}

impl TokenIdMap {
    /// Build the map from a vocabulary. `unk` must be one of its tokens.
    pub fn new(vocab: &Vocabulary, unk: &str) -> Result<Self> {
        let tokens: Vec<Symbol> = vocab.sorted().into_iter().map(Symbol::new).collect();
        let ids: AHashMap<Symbol, u32> = tokens
            .iter()
            .enumerate()
            .map(|(id, token)| (token.clone(), id as u32))
            .collect();
        let unk_id = *ids.get(unk).ok_or_else(|| {
            TokenizerError::InvalidConfig(format!(
                "Unknown token {unk:?} is not in the vocabulary"
            ))
        })?;

        Ok(Self {
            tokens,
            ids,
            unk_id,
        })
    }

    /// Number of ids.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Id of the unknown token.
    #[inline]
    pub fn unk_id(&self) -> u32 {
        self.unk_id
    }

    /// Id of one token, falling back to the unknown id.
    #[inline]
    pub fn id(&self, token: &str) -> u32 {
        self.ids.get(token).copied().unwrap_or(self.unk_id)
    }

    /// Token for one id, falling back to the unknown token.
    #[inline]
    pub fn token(&self, id: u32) -> &str {
        self.tokens
            .get(id as usize)
            .unwrap_or(&self.tokens[self.unk_id as usize])
    }

    /// Map tokens to ids.
    pub fn token_to_id<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        tokens.iter().map(|t| self.id(t.as_ref())).collect()
    }

    /// Map ids to tokens.
    pub fn id_to_token(&self, ids: &[u32]) -> Vec<Symbol> {
        ids.iter().map(|&id| Symbol::new(self.token(id))).collect()
    }

    /// Tokens in id order.
    pub fn tokens(&self) -> &[Symbol] {
        &self.tokens
    }
}
