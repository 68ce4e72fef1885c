//! Word splitting shared by training and encoding.
//!
//! Text is cut into maximal whitespace-delimited runs, except that special
//! token literals are atomic words wherever they occur, even glued to other
//! characters: `end.<EOS>next` is `end.`, `<EOS>`, `next`.

use crate::core::vocab::SpecialTokens;
use crate::error::{Result, TokenizerError};
use log::debug;
use regex::Regex;
use std::borrow::Cow;

/// Invisible private-use markers and the role they stand for.
const INVISIBLE_EOS: char = '\u{E000}';
const INVISIBLE_EOP: char = '\u{E001}';
const INVISIBLE_EOT: char = '\u{E002}';

/// One word produced by the splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Ordinary word, split into characters by the model
    Word(&'a str),
    /// Special token literal, kept whole
    Special(&'a str),
}

impl<'a> Piece<'a> {
    /// The underlying text.
    pub fn as_str(&self) -> &'a str {
        match *self {
            Piece::Word(s) | Piece::Special(s) => s,
        }
    }
}

/// Splits text into [`Piece`]s.
#[derive(Debug, Clone)]
pub struct WordSplitter {
    /// Alternation of escaped special literals, longest first
    special_regex: Option<Regex>,
    /// Literals substituted for the invisible markers
    eos: String,
    eop: String,
    eot: String,
}

impl WordSplitter {
    /// Create a splitter recognizing the given special tokens.
    pub fn new(special: &SpecialTokens) -> Result<Self> {
        Ok(Self {
            special_regex: build_pattern(special.iter())?,
            eos: special.eos.clone(),
            eop: special.eop.clone(),
            eot: special.eot.clone(),
        })
    }

    /// Split text into words and special tokens, in order.
    pub fn split<'t>(&self, text: &'t str) -> Vec<Piece<'t>> {
        let mut pieces = Vec::new();
        let mut start = 0;
        if let Some(regex) = &self.special_regex {
            for m in regex.find_iter(text) {
                push_words(&mut pieces, &text[start..m.start()]);
                pieces.push(Piece::Special(m.as_str()));
                start = m.end();
            }
        }
        push_words(&mut pieces, &text[start..]);
        pieces
    }

    /// Replace the invisible marker characters U+E000..U+E002 with the
    /// end-of-sentence, end-of-paragraph and end-of-text literals, padded
    /// with spaces.
    pub fn expand_markers<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !text.contains([INVISIBLE_EOS, INVISIBLE_EOP, INVISIBLE_EOT]) {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len() + 16);
        for ch in text.chars() {
            let literal = match ch {
                INVISIBLE_EOS => &self.eos,
                INVISIBLE_EOP => &self.eop,
                INVISIBLE_EOT => &self.eot,
                _ => {
                    out.push(ch);
                    continue;
                }
            };
            out.push(' ');
            out.push_str(literal);
            out.push(' ');
        }
        Cow::Owned(out)
    }
}

fn push_words<'t>(pieces: &mut Vec<Piece<'t>>, segment: &'t str) {
    pieces.extend(segment.split_whitespace().map(Piece::Word));
}

fn build_pattern<'a>(literals: impl IntoIterator<Item = &'a str>) -> Result<Option<Regex>> {
    let mut literals: Vec<&str> = literals.into_iter().filter(|s| !s.is_empty()).collect();
    if literals.is_empty() {
        return Ok(None);
    }
    // Leftmost-first alternation: put longer literals ahead of their prefixes.
    literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let pattern = literals
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|");
    debug!("Special token pattern: {}", pattern);
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| TokenizerError::InvalidConfig(format!("Invalid special token pattern: {e}")))
}
