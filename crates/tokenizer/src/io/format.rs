//! Format definitions for tokenizer serialization.
//!
//! A trained tokenizer is stored as a single `tokenizer.json`:
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "vocab": ["</w>", "<BOS>", "...", "er", "lo"],
//!   "merges": [{ "pair": ["e", "r"], "merged": "er" }],
//!   "vocab_size": 250,
//!   "special_tokens": ["<PAD>", "<UNK>", "<BOS>", "<EOS>", "<EOP>", "<EOT>"]
//! }
//! ```
//!
//! Every field except `version` is required.

use pairwise_core::{MergeTable, SpecialTokens};
use serde::{Deserialize, Serialize};

/// Artifact file name inside a tokenizer directory.
pub const TOKENIZER_FILE: &str = "tokenizer.json";
/// Human-readable merge listing.
pub const MERGES_FILE: &str = "merges.txt";
/// Human-readable vocabulary listing.
pub const VOCAB_FILE: &str = "vocab.txt";

/// Complete tokenizer serialization format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedTokenizer {
    /// Format version, informational only
    #[serde(default)]
    pub version: String,
    /// Vocabulary in id order
    pub vocab: Vec<String>,
    /// Merge rules in training order
    pub merges: MergeTable,
    /// Target vocabulary size the tokenizer was trained for
    pub vocab_size: usize,
    /// Special tokens: six roles, then extras
    pub special_tokens: SpecialTokens,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairwise_core::MergeRule;

    #[test]
    fn test_serialization_roundtrip() {
        let data = SerializedTokenizer {
            version: "0.1.0".to_string(),
            vocab: vec!["e".into(), "er".into(), "r".into()],
            merges: vec![MergeRule::new("e", "r")].into(),
            vocab_size: 3,
            special_tokens: SpecialTokens::default(),
        };

        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains(r#"{"pair":["e","r"],"merged":"er"}"#));
        assert!(json.contains(r#""special_tokens":["<PAD>","<UNK>","<BOS>","<EOS>","<EOP>","<EOT>"]"#));

        let deserialized: SerializedTokenizer = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, data);
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{
            "version": "0.1.0",
            "vocab": ["a"],
            "vocab_size": 10,
            "special_tokens": ["<PAD>", "<UNK>", "<BOS>", "<EOS>", "<EOP>", "<EOT>"]
        }"#;
        assert!(serde_json::from_str::<SerializedTokenizer>(json).is_err());
    }

    #[test]
    fn test_version_optional() {
        let json = r#"{
            "vocab": ["a"],
            "merges": [],
            "vocab_size": 10,
            "special_tokens": ["<PAD>", "<UNK>", "<BOS>", "<EOS>", "<EOP>", "<EOT>"]
        }"#;
        let data: SerializedTokenizer = serde_json::from_str(json).unwrap();
        assert!(data.version.is_empty());
        assert!(data.merges.is_empty());
    }
}
