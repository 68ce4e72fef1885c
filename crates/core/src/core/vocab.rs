//! Vocabulary storage and special tokens.
//!
//! The vocabulary is a plain set of token strings. Ids are not stored here;
//! they are derived on demand by [`TokenIdMap`](super::id_map::TokenIdMap)
//! from the sorted token list.

use super::symbol::{Symbol, END_OF_WORD};
use crate::error::{Result, TokenizerError};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Set of distinct token strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: AHashSet<Symbol>,
    /// Size of the vocabulary before any merged token was added
    base_size: usize,
}

impl Vocabulary {
    /// Create a new empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new vocabulary with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: AHashSet::with_capacity(capacity),
            base_size: 0,
        }
    }

    /// Build the base vocabulary: special tokens, the end-of-word marker and
    /// every observed character. The base size is fixed afterwards.
    pub fn base<'a>(special: &SpecialTokens, chars: impl IntoIterator<Item = &'a str>) -> Self {
        let mut vocab = Self::new();
        for token in special.iter() {
            vocab.insert(token);
        }
        vocab.insert(END_OF_WORD);
        for ch in chars {
            vocab.insert(ch);
        }
        vocab.base_size = vocab.len();
        vocab
    }

    /// Rebuild a vocabulary from a token list with a known base size.
    ///
    /// Fails on duplicate entries.
    pub fn from_tokens<I, S>(tokens: I, base_size: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::new();
        for token in tokens {
            let token = token.as_ref();
            if !vocab.insert(token) {
                return Err(TokenizerError::Load(format!(
                    "Duplicate vocabulary entry: {token:?}"
                )));
            }
        }
        if base_size > vocab.len() {
            return Err(TokenizerError::Load(format!(
                "Base size {} exceeds vocabulary size {}",
                base_size,
                vocab.len()
            )));
        }
        vocab.base_size = base_size;
        Ok(vocab)
    }

    /// Add a token. Returns `false` if it was already present.
    pub fn insert(&mut self, token: &str) -> bool {
        if self.tokens.contains(token) {
            return false;
        }
        self.tokens.insert(Symbol::new(token))
    }

    /// Check whether a token is present.
    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Get the size of the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Size of the vocabulary at the end of extraction.
    #[inline]
    pub fn base_size(&self) -> usize {
        self.base_size
    }

    /// Tokens in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.as_str())
    }

    /// Tokens sorted by code point. This is the id order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.iter().collect();
        tokens.sort_unstable();
        tokens
    }

    /// Count special, character and subword tokens.
    pub fn stats(&self, special: &SpecialTokens) -> VocabStats {
        let mut stats = VocabStats {
            total: self.len(),
            ..Default::default()
        };
        for token in self.iter() {
            if special.contains(token) {
                stats.special += 1;
            } else if token == END_OF_WORD || token.chars().count() == 1 {
                stats.characters += 1;
            } else {
                stats.subwords += 1;
            }
        }
        stats
    }
}

/// Breakdown of a vocabulary by token kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VocabStats {
    /// Total number of tokens
    pub total: usize,
    /// Configured special tokens
    pub special: usize,
    /// Single characters and the end-of-word marker
    pub characters: usize,
    /// Tokens produced by merges
    pub subwords: usize,
}

/// Atomic special tokens.
///
/// Six roles have fixed positions; any number of extra literals may follow.
/// On disk this is an ordered list: `pad, unk, bos, eos, eop, eot, extra...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct SpecialTokens {
    /// Padding
    pub pad: String,
    /// Unknown token; out-of-vocabulary tokens map to its id
    pub unk: String,
    /// Beginning of sequence
    pub bos: String,
    /// End of sentence
    pub eos: String,
    /// End of paragraph
    pub eop: String,
    /// End of text
    pub eot: String,
    /// Additional atomic literals without a role
    pub extra: Vec<String>,
}

/// Number of role tokens at the head of the serialized list.
const ROLE_COUNT: usize = 6;

impl Default for SpecialTokens {
    fn default() -> Self {
        Self {
            pad: "<PAD>".to_string(),
            unk: "<UNK>".to_string(),
            bos: "<BOS>".to_string(),
            eos: "<EOS>".to_string(),
            eop: "<EOP>".to_string(),
            eot: "<EOT>".to_string(),
            extra: Vec::new(),
        }
    }
}

impl SpecialTokens {
    /// Add an extra atomic literal.
    pub fn with_extra(mut self, token: impl Into<String>) -> Self {
        self.extra.push(token.into());
        self
    }

    /// All literals, roles first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            self.pad.as_str(),
            self.unk.as_str(),
            self.bos.as_str(),
            self.eos.as_str(),
            self.eop.as_str(),
            self.eot.as_str(),
        ]
        .into_iter()
        .chain(self.extra.iter().map(String::as_str))
    }

    /// Number of literals.
    pub fn len(&self) -> usize {
        ROLE_COUNT + self.extra.len()
    }

    /// Always `false`; the roles are mandatory.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if a string is one of the literals.
    pub fn contains(&self, token: &str) -> bool {
        self.iter().any(|t| t == token)
    }

    /// Text a boundary token turns into when decoding, if it has one.
    pub fn substitution(&self, token: &str) -> Option<&'static str> {
        if token == self.eos || token == self.eot {
            Some("")
        } else if token == self.eop {
            Some("\n\n")
        } else {
            None
        }
    }

    /// Literals must be non-empty, distinct and differ from the end-of-word
    /// marker.
    pub fn validate(&self) -> Result<()> {
        let mut seen = AHashSet::with_capacity(self.len());
        for token in self.iter() {
            if token.is_empty() {
                return Err(TokenizerError::InvalidConfig(
                    "Special token must not be empty".to_string(),
                ));
            }
            if token == END_OF_WORD {
                return Err(TokenizerError::InvalidConfig(format!(
                    "Special token {token:?} collides with the end-of-word marker"
                )));
            }
            if !seen.insert(token) {
                return Err(TokenizerError::InvalidConfig(format!(
                    "Duplicate special token {token:?}"
                )));
            }
        }
        Ok(())
    }
}

impl From<SpecialTokens> for Vec<String> {
    fn from(special: SpecialTokens) -> Self {
        let mut list = Vec::with_capacity(special.len());
        list.extend([
            special.pad,
            special.unk,
            special.bos,
            special.eos,
            special.eop,
            special.eot,
        ]);
        list.extend(special.extra);
        list
    }
}

impl TryFrom<Vec<String>> for SpecialTokens {
    type Error = TokenizerError;

    fn try_from(list: Vec<String>) -> Result<Self> {
        if list.len() < ROLE_COUNT {
            return Err(TokenizerError::Load(format!(
                "Expected at least {} special tokens, found {}",
                ROLE_COUNT,
                list.len()
            )));
        }
        let mut iter = list.into_iter();
        let mut next = || iter.next().unwrap_or_default();
        let special = Self {
            pad: next(),
            unk: next(),
            bos: next(),
            eos: next(),
            eop: next(),
            eot: next(),
            extra: Vec::new(),
        };
        let special = Self {
            extra: iter.collect(),
            ..special
        };
        special
            .validate()
            .map_err(|e| TokenizerError::Load(e.to_string()))?;
        Ok(special)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_vocabulary() {
        let special = SpecialTokens::default();
        let vocab = Vocabulary::base(&special, ["l", "o", "w", "o"]);

        assert_eq!(vocab.len(), 6 + 1 + 3);
        assert_eq!(vocab.base_size(), vocab.len());
        assert!(vocab.contains("<UNK>"));
        assert!(vocab.contains(END_OF_WORD));
        assert!(vocab.contains("w"));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut vocab = Vocabulary::new();
        assert!(vocab.insert("hello"));
        assert!(!vocab.insert("hello"));
        assert_eq!(vocab.len(), 1);
    }

    #[test]
    fn test_sorted_by_code_point() {
        let vocab = Vocabulary::from_tokens(["b", "a", "</w>", "<UNK>", "é", "Z"], 6).unwrap();
        assert_eq!(vocab.sorted(), vec!["</w>", "<UNK>", "Z", "a", "b", "é"]);
    }

    #[test]
    fn test_from_tokens_rejects_duplicates() {
        let err = Vocabulary::from_tokens(["a", "b", "a"], 3).unwrap_err();
        assert!(matches!(err, TokenizerError::Load(_)));
    }

    #[test]
    fn test_stats() {
        let special = SpecialTokens::default();
        let mut vocab = Vocabulary::base(&special, ["e", "r"]);
        vocab.insert("er");
        vocab.insert("er</w>");

        let stats = vocab.stats(&special);
        assert_eq!(stats.total, 11);
        assert_eq!(stats.special, 6);
        assert_eq!(stats.characters, 3);
        assert_eq!(stats.subwords, 2);
    }

    #[test]
    fn test_special_list_roundtrip() {
        let special = SpecialTokens::default().with_extra("<SEP>");
        let list: Vec<String> = special.clone().into();
        assert_eq!(
            list,
            vec!["<PAD>", "<UNK>", "<BOS>", "<EOS>", "<EOP>", "<EOT>", "<SEP>"]
        );
        assert_eq!(SpecialTokens::try_from(list).unwrap(), special);
    }

    #[test]
    fn test_special_list_too_short() {
        let list = vec!["<PAD>".to_string(), "<UNK>".to_string()];
        assert!(SpecialTokens::try_from(list).is_err());
    }

    #[test]
    fn test_special_validate() {
        let mut special = SpecialTokens::default();
        special.eot = special.eos.clone();
        assert!(special.validate().is_err());

        let special = SpecialTokens::default().with_extra(END_OF_WORD);
        assert!(special.validate().is_err());
    }

    #[test]
    fn test_substitution() {
        let special = SpecialTokens::default();
        assert_eq!(special.substitution("<EOS>"), Some(""));
        assert_eq!(special.substitution("<EOP>"), Some("\n\n"));
        assert_eq!(special.substitution("<EOT>"), Some(""));
        assert_eq!(special.substitution("<BOS>"), None);
        assert_eq!(special.substitution("hello"), None);
    }
}
