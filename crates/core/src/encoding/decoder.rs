//! Symbol sequence -> text.

use crate::core::symbol::END_OF_WORD;
use crate::core::vocab::SpecialTokens;

/// Rebuilds readable text from symbols.
///
/// Symbols are concatenated as-is, every end-of-word marker becomes a single
/// space, boundary specials are substituted (end of sentence and end of text
/// vanish, end of paragraph becomes a blank line) and the result is trimmed.
///
/// Text that itself contained those substitution targets, or runs of
/// whitespace, does not come back byte-for-byte.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    special: &'a SpecialTokens,
}

impl<'a> Decoder<'a> {
    /// Create a decoder for a set of special tokens.
    pub fn new(special: &'a SpecialTokens) -> Self {
        Self { special }
    }

    /// Decode symbols to text.
    pub fn decode<S: AsRef<str>>(&self, symbols: &[S]) -> String {
        let joined: String = symbols.iter().map(|s| s.as_ref()).collect();
        let mut text = joined.replace(END_OF_WORD, " ");
        for literal in [&self.special.eos, &self.special.eop, &self.special.eot] {
            if let Some(substitute) = self.special.substitution(literal) {
                text = text.replace(literal.as_str(), substitute);
            }
        }
        text.trim().to_string()
    }
}
