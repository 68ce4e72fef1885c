//! Merge rule management for BPE.
//!
//! Rules are kept in the order they were learned. That order is the replay
//! order at encoding time, so the table is a plain ordered sequence rather
//! than a pair-keyed map.

use super::symbol::{Pair, Symbol};
use serde::{Deserialize, Serialize};

/// A learned rule: `left + right -> merged`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeRule {
    /// The pair of symbols collapsed by this rule
    pub pair: Pair,
    /// Concatenation of the pair
    pub merged: Symbol,
}

impl MergeRule {
    /// Create a rule for a pair; the merged symbol is the concatenation.
    pub fn new(left: impl Into<Symbol>, right: impl Into<Symbol>) -> Self {
        let left = left.into();
        let right = right.into();
        let mut merged = Symbol::with_capacity(left.len() + right.len());
        merged.push_str(&left);
        merged.push_str(&right);
        Self {
            pair: (left, right),
            merged,
        }
    }

    /// Left member of the pair.
    #[inline]
    pub fn left(&self) -> &str {
        &self.pair.0
    }

    /// Right member of the pair.
    #[inline]
    pub fn right(&self) -> &str {
        &self.pair.1
    }

    /// Whether `merged` really is `left + right`.
    pub fn is_consistent(&self) -> bool {
        self.merged.len() == self.pair.0.len() + self.pair.1.len()
            && self.merged.starts_with(self.pair.0.as_str())
            && self.merged.ends_with(self.pair.1.as_str())
    }

    /// Collapse every occurrence of this rule's pair in `symbols`.
    ///
    /// See [`merge_pair`].
    pub fn apply(&self, symbols: &[Symbol]) -> Vec<Symbol> {
        merge_pair(symbols, &self.pair, &self.merged)
    }

    /// Collapse occurrences in place, skipping the allocation when the pair
    /// does not occur.
    pub fn apply_in_place(&self, symbols: &mut Vec<Symbol>) {
        if contains_pair(symbols, &self.pair) {
            *symbols = self.apply(symbols);
        }
    }
}

/// Rewrite `symbols` in a single left-to-right pass, replacing each
/// occurrence of `pair` with `merged`.
///
/// A freshly produced `merged` symbol is never re-examined in the same pass,
/// so occurrences never overlap: `a a a` with pair `(a, a)` becomes `aa a`.
pub fn merge_pair(symbols: &[Symbol], pair: &Pair, merged: &Symbol) -> Vec<Symbol> {
    let mut out = Vec::with_capacity(symbols.len());
    let mut i = 0;
    while i < symbols.len() {
        if i + 1 < symbols.len() && symbols[i] == pair.0 && symbols[i + 1] == pair.1 {
            out.push(merged.clone());
            i += 2;
        } else {
            out.push(symbols[i].clone());
            i += 1;
        }
    }
    out
}

/// Whether `pair` occurs as adjacent symbols.
#[inline]
pub fn contains_pair(symbols: &[Symbol], pair: &Pair) -> bool {
    symbols
        .windows(2)
        .any(|w| w[0] == pair.0 && w[1] == pair.1)
}

/// Ordered collection of merge rules, in training order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergeTable {
    rules: Vec<MergeRule>,
}

impl MergeTable {
    /// Create a new empty merge table.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a new table with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rules: Vec::with_capacity(capacity),
        }
    }

    /// Append a rule; its rank is the current length.
    pub fn push(&mut self, rule: MergeRule) {
        self.rules.push(rule);
    }

    /// Rule at a given rank.
    #[inline]
    pub fn get(&self, rank: usize) -> Option<&MergeRule> {
        self.rules.get(rank)
    }

    /// Rules in training order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, MergeRule> {
        self.rules.iter()
    }

    /// Rules as a slice, in training order.
    #[inline]
    pub fn as_slice(&self) -> &[MergeRule] {
        &self.rules
    }

    /// Get the number of merge rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no merge rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Replay every rule, in order, over a symbol sequence.
    ///
    /// Each rule gets one full pass before the next rule is considered. This
    /// is not the same as repeatedly merging the best-ranked applicable pair.
    pub fn replay(&self, mut symbols: Vec<Symbol>) -> Vec<Symbol> {
        for rule in &self.rules {
            if symbols.len() < 2 {
                break;
            }
            rule.apply_in_place(&mut symbols);
        }
        symbols
    }
}

impl From<Vec<MergeRule>> for MergeTable {
    fn from(rules: Vec<MergeRule>) -> Self {
        Self { rules }
    }
}

impl FromIterator<MergeRule> for MergeTable {
    fn from_iter<I: IntoIterator<Item = MergeRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MergeTable {
    type Item = &'a MergeRule;
    type IntoIter = std::slice::Iter<'a, MergeRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbol::word_symbols;

    fn syms(items: &[&str]) -> Vec<Symbol> {
        items.iter().map(|s| Symbol::new(s)).collect()
    }

    #[test]
    fn test_rule_concatenates() {
        let rule = MergeRule::new("er", "</w>");
        assert_eq!(rule.merged, "er</w>");
        assert_eq!(rule.left(), "er");
        assert_eq!(rule.right(), "</w>");
        assert!(rule.is_consistent());
    }

    #[test]
    fn test_inconsistent_rule() {
        let rule = MergeRule {
            pair: (Symbol::new("a"), Symbol::new("b")),
            merged: Symbol::new("ba"),
        };
        assert!(!rule.is_consistent());
    }

    #[test]
    fn test_merge_all_occurrences() {
        let rule = MergeRule::new("e", "r");
        let out = rule.apply(&syms(&["n", "e", "w", "e", "r", "e", "r", "</w>"]));
        assert_eq!(out, syms(&["n", "e", "w", "er", "er", "</w>"]));
    }

    #[test]
    fn test_merge_non_overlapping() {
        let rule = MergeRule::new("a", "a");
        assert_eq!(rule.apply(&syms(&["a", "a", "a"])), syms(&["aa", "a"]));
        assert_eq!(rule.apply(&syms(&["a", "a", "a", "a"])), syms(&["aa", "aa"]));
    }

    #[test]
    fn test_merge_does_not_rescan_new_symbol() {
        // After (a, b) -> ab the new symbol must not pair with a following b
        // through some other rule in the same pass.
        let rule = MergeRule::new("a", "b");
        assert_eq!(rule.apply(&syms(&["a", "b", "b"])), syms(&["ab", "b"]));
    }

    #[test]
    fn test_replay_in_order() {
        let table: MergeTable = vec![
            MergeRule::new("e", "r"),
            MergeRule::new("er", "</w>"),
            MergeRule::new("l", "o"),
        ]
        .into();

        assert_eq!(table.replay(word_symbols("lower")), syms(&["lo", "w", "er</w>"]));
        assert_eq!(table.replay(word_symbols("low")), syms(&["lo", "w", "</w>"]));
    }

    #[test]
    fn test_replay_order_matters() {
        // Replaying (b, c) before (a, b) gives a different result than the
        // reverse order.
        let forward: MergeTable = vec![MergeRule::new("a", "b"), MergeRule::new("b", "c")].into();
        let reverse: MergeTable = vec![MergeRule::new("b", "c"), MergeRule::new("a", "b")].into();

        assert_eq!(forward.replay(syms(&["a", "b", "c"])), syms(&["ab", "c"]));
        assert_eq!(reverse.replay(syms(&["a", "b", "c"])), syms(&["a", "bc"]));
    }

    #[test]
    fn test_table_preserves_insertion_order() {
        let mut table = MergeTable::with_capacity(2);
        table.push(MergeRule::new("z", "z"));
        table.push(MergeRule::new("a", "a"));

        let merged: Vec<&str> = table.iter().map(|r| r.merged.as_str()).collect();
        assert_eq!(merged, vec!["zz", "aa"]);
        assert_eq!(table.get(0).map(|r| r.left()), Some("z"));
    }
}
