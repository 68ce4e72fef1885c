//! Symbols and word representations.
//!
//! A symbol is an immutable string fragment: a single character, the
//! end-of-word marker, a special token literal or a fragment produced by an
//! earlier merge. Symbols are compared and concatenated by value.

use compact_str::CompactString;

/// An atomic string unit of a word representation.
pub type Symbol = CompactString;

/// A pair of adjacent symbols.
pub type Pair = (Symbol, Symbol);

/// Marker appended to every word so word-final fragments differ from
/// word-internal ones.
pub const END_OF_WORD: &str = "</w>";

/// Split a word into one symbol per character followed by [`END_OF_WORD`].
///
/// An empty word yields just the marker.
pub fn word_symbols(word: &str) -> Vec<Symbol> {
    let mut symbols = Vec::with_capacity(word.chars().count() + 1);
    let mut buf = [0u8; 4];
    for ch in word.chars() {
        symbols.push(Symbol::new(ch.encode_utf8(&mut buf)));
    }
    symbols.push(Symbol::new(END_OF_WORD));
    symbols
}
