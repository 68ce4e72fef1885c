//! Load functionality for pre-trained tokenizers.
//!
//! Loading either yields a fully consistent set of parts or fails with
//! [`TokenizerError::Load`]; nothing partially populated is returned.

use super::format::{SerializedTokenizer, TOKENIZER_FILE};
use ahash::AHashSet;
use log::info;
use pairwise_core::{MergeTable, Result, SpecialTokens, TokenizerError, Vocabulary};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Validated contents of a tokenizer artifact.
#[derive(Debug, Clone)]
pub struct LoadedTokenizer {
    pub vocab: Vocabulary,
    pub merges: MergeTable,
    pub special: SpecialTokens,
    pub vocab_size: usize,
}

/// Tokenizer loader - handles loading trained models.
pub struct TokenizerLoader;

impl TokenizerLoader {
    /// Load a tokenizer from a directory.
    ///
    /// Expects a `tokenizer.json` file in the given directory.
    pub fn load(path: &Path) -> Result<LoadedTokenizer> {
        let file_path = path.join(TOKENIZER_FILE);
        let file = File::open(&file_path).map_err(|e| {
            TokenizerError::Load(format!(
                "Failed to open file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        let reader = BufReader::new(file);
        let serialized: SerializedTokenizer = serde_json::from_reader(reader)
            .map_err(|e| TokenizerError::Load(format!("Failed to deserialize tokenizer: {}", e)))?;

        let loaded = Self::deserialize(serialized)?;
        info!(
            "Loaded tokenizer from {} ({} tokens, {} merges)",
            path.display(),
            loaded.vocab.len(),
            loaded.merges.len()
        );
        Ok(loaded)
    }

    /// Load from a JSON string.
    pub fn from_json(json: &str) -> Result<LoadedTokenizer> {
        let serialized: SerializedTokenizer = serde_json::from_str(json)
            .map_err(|e| TokenizerError::Load(format!("Failed to deserialize tokenizer: {}", e)))?;
        Self::deserialize(serialized)
    }

    /// Check integrity and rebuild the in-memory parts.
    pub fn deserialize(data: SerializedTokenizer) -> Result<LoadedTokenizer> {
        let SerializedTokenizer {
            vocab: tokens,
            merges,
            vocab_size,
            special_tokens: special,
            ..
        } = data;

        special
            .validate()
            .map_err(|e| TokenizerError::Load(e.to_string()))?;

        // Merged strings not present before training; a merge that produced a
        // base token adds nothing.
        let merged: AHashSet<&str> = merges.iter().map(|r| r.merged.as_str()).collect();
        let base_size = tokens.len().saturating_sub(merged.len());
        let vocab = Vocabulary::from_tokens(&tokens, base_size)?;

        for token in special.iter() {
            if !vocab.contains(token) {
                return Err(TokenizerError::Load(format!(
                    "Special token {token:?} missing from vocabulary"
                )));
            }
        }

        for (rank, rule) in merges.iter().enumerate() {
            if !rule.is_consistent() {
                return Err(TokenizerError::Load(format!(
                    "Merge {} is inconsistent: '{}' + '{}' -> '{}'",
                    rank + 1,
                    rule.left(),
                    rule.right(),
                    rule.merged
                )));
            }
            for token in [rule.left(), rule.right(), rule.merged.as_str()] {
                if !vocab.contains(token) {
                    return Err(TokenizerError::Load(format!(
                        "Merge {} references unknown token {token:?}",
                        rank + 1
                    )));
                }
            }
        }

        Ok(LoadedTokenizer {
            vocab,
            merges,
            special,
            vocab_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECIALS: &str = r#"["<PAD>", "<UNK>", "<BOS>", "<EOS>", "<EOP>", "<EOT>"]"#;
    const BASE: &str =
        r#""</w>", "<BOS>", "<EOP>", "<EOS>", "<EOT>", "<PAD>", "<UNK>", "e", "r""#;

    fn artifact(vocab: &str, merges: &str) -> String {
        format!(
            r#"{{"version": "0.1.0", "vocab": [{vocab}], "merges": [{merges}],
                "vocab_size": 20, "special_tokens": {SPECIALS}}}"#
        )
    }

    #[test]
    fn test_load_valid() {
        let json = artifact(
            &format!(r#"{BASE}, "er""#),
            r#"{"pair": ["e", "r"], "merged": "er"}"#,
        );
        let loaded = TokenizerLoader::from_json(&json).unwrap();

        assert_eq!(loaded.vocab.len(), 10);
        assert_eq!(loaded.vocab.base_size(), 9);
        assert_eq!(loaded.merges.len(), 1);
        assert_eq!(loaded.vocab_size, 20);
    }

    #[test]
    fn test_inconsistent_merge() {
        let json = artifact(
            &format!(r#"{BASE}, "re""#),
            r#"{"pair": ["e", "r"], "merged": "re"}"#,
        );
        let err = TokenizerLoader::from_json(&json).unwrap_err();
        assert!(matches!(err, TokenizerError::Load(_)));
    }

    #[test]
    fn test_merge_token_missing() {
        let json = artifact(BASE, r#"{"pair": ["e", "r"], "merged": "er"}"#);
        assert!(TokenizerLoader::from_json(&json).is_err());
    }

    #[test]
    fn test_special_missing() {
        let json = artifact(r#""</w>", "e""#, "");
        assert!(TokenizerLoader::from_json(&json).is_err());
    }

    #[test]
    fn test_duplicate_vocab_entry() {
        let json = artifact(&format!(r#"{BASE}, "e""#), "");
        assert!(TokenizerLoader::from_json(&json).is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = TokenizerLoader::from_json("{\"vocab\": [").unwrap_err();
        assert!(matches!(err, TokenizerError::Load(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TokenizerLoader::load(dir.path()).unwrap_err();
        assert!(matches!(err, TokenizerError::Load(_)));
    }
}
