//! Save functionality for trained tokenizers.
//!
//! Each file is first written to a `.tmp` sibling and then renamed into
//! place, so an interrupted save never leaves a truncated artifact behind.

use super::format::{SerializedTokenizer, MERGES_FILE, TOKENIZER_FILE, VOCAB_FILE};
use log::info;
use pairwise_core::{MergeTable, Result, SpecialTokens, TokenizerError, Vocabulary};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Tokenizer saver - handles saving trained models.
pub struct TokenizerSaver<'a> {
    /// Vocabulary reference
    vocab: &'a Vocabulary,
    /// Merge rules reference
    merges: &'a MergeTable,
    /// Special tokens reference
    special: &'a SpecialTokens,
    /// Target vocabulary size
    vocab_size: usize,
}

impl<'a> TokenizerSaver<'a> {
    /// Create a new tokenizer saver.
    pub fn new(
        vocab: &'a Vocabulary,
        merges: &'a MergeTable,
        special: &'a SpecialTokens,
        vocab_size: usize,
    ) -> Self {
        Self {
            vocab,
            merges,
            special,
            vocab_size,
        }
    }

    /// Save the tokenizer to a directory.
    ///
    /// Writes `tokenizer.json` plus the `merges.txt` and `vocab.txt`
    /// listings. The directory is created if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| TokenizerError::io(path, e))?;

        let serialized = self.serialize();
        write_atomic(&path.join(TOKENIZER_FILE), |writer| {
            serde_json::to_writer_pretty(&mut *writer, &serialized).map_err(|e| {
                TokenizerError::Save(format!("Failed to serialize tokenizer: {}", e))
            })?;
            writeln!(writer).map_err(|e| TokenizerError::Save(e.to_string()))
        })?;
        write_atomic(&path.join(MERGES_FILE), |writer| {
            self.write_merges(writer)
                .map_err(|e| TokenizerError::Save(format!("Failed to write merges: {}", e)))
        })?;
        write_atomic(&path.join(VOCAB_FILE), |writer| {
            self.write_vocab(writer)
                .map_err(|e| TokenizerError::Save(format!("Failed to write vocabulary: {}", e)))
        })?;

        info!(
            "Saved tokenizer ({} tokens, {} merges) to {}",
            self.vocab.len(),
            self.merges.len(),
            path.display()
        );
        Ok(())
    }

    /// Serialize the tokenizer to a structure.
    pub fn serialize(&self) -> SerializedTokenizer {
        SerializedTokenizer {
            version: env!("CARGO_PKG_VERSION").to_string(),
            vocab: self.vocab.sorted().into_iter().map(str::to_string).collect(),
            merges: self.merges.clone(),
            vocab_size: self.vocab_size,
            special_tokens: self.special.clone(),
        }
    }

    /// Write the numbered merge listing.
    pub fn write_merges<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# BPE merge operations")?;
        writeln!(writer, "# Format: N. 'left' + 'right' -> 'merged'")?;
        writeln!(writer)?;
        for (i, rule) in self.merges.iter().enumerate() {
            writeln!(
                writer,
                "{}. '{}' + '{}' -> '{}'",
                i + 1,
                rule.left(),
                rule.right(),
                rule.merged
            )?;
        }
        Ok(())
    }

    /// Write the vocabulary listing in id order.
    pub fn write_vocab<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# BPE vocabulary")?;
        writeln!(writer, "# Size: {}", self.vocab.len())?;
        writeln!(writer)?;
        for (id, token) in self.vocab.sorted().into_iter().enumerate() {
            writeln!(writer, "{}. {}", id, token)?;
        }
        Ok(())
    }
}

/// Write `path` through a temporary sibling and rename it into place.
fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let temp_path = temp_path(path);
    let result = (|| {
        let file = File::create(&temp_path).map_err(|e| TokenizerError::io(&temp_path, e))?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        let file = writer
            .into_inner()
            .map_err(|e| TokenizerError::io(&temp_path, e.into_error()))?;
        file.sync_all()
            .map_err(|e| TokenizerError::io(&temp_path, e))?;
        std::fs::rename(&temp_path, path).map_err(|e| TokenizerError::io(path, e))
    })();

    if result.is_err() {
        std::fs::remove_file(&temp_path).ok();
    }
    result
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
