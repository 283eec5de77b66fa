//! Canonical symbol sets.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::symbol::SymbolId;

/// Identifier of a set in the [`SetStore`](super::SetStore) universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SetId(u32);

impl SetId {
    /// Create a `SetId` from a raw `u32`.
    pub fn new(raw: u32) -> Self {
        SetId(raw)
    }

    /// Get the underlying `u32` value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The id as a vector index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "set:{}", self.0)
    }
}

/// A sorted set of distinct symbols, immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSet {
    id: SetId,
    symbols: Vec<SymbolId>,
}

impl SymbolSet {
    /// `symbols` must already be sorted and free of duplicates.
    pub(super) fn new(id: SetId, symbols: Vec<SymbolId>) -> Self {
        debug_assert!(symbols.windows(2).all(|w| w[0] < w[1]));
        Self { id, symbols }
    }

    pub fn id(&self) -> SetId {
        self.id
    }

    /// Members in ascending id order.
    pub fn symbols(&self) -> &[SymbolId] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: SymbolId) -> bool {
        self.symbols.binary_search(&symbol).is_ok()
    }

    /// Whether every member of `self` is a member of `other`.
    pub fn is_subset_of(&self, other: &SymbolSet) -> bool {
        self.symbols.iter().all(|s| other.contains(*s))
    }
}

/// Dedup lookup key: cardinality first, then element-wise lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ContentKey(pub(super) Vec<SymbolId>);

impl Ord for ContentKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ContentKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(ids: &[u32]) -> ContentKey {
        ContentKey(ids.iter().copied().map(SymbolId::new).collect())
    }

    #[test]
    fn shorter_sets_order_first() {
        assert!(key(&[9]) < key(&[0, 1]));
        assert!(key(&[5, 6]) < key(&[0, 1, 2]));
    }

    #[test]
    fn equal_sizes_order_lexicographically() {
        assert!(key(&[0, 2]) < key(&[1, 2]));
        assert!(key(&[1, 2]) < key(&[1, 3]));
        assert_eq!(key(&[1, 3]).cmp(&key(&[1, 3])), Ordering::Equal);
    }

    #[test]
    fn subset_and_membership() {
        let small = SymbolSet::new(SetId::new(0), vec![SymbolId::new(2)]);
        let big = SymbolSet::new(
            SetId::new(1),
            vec![SymbolId::new(1), SymbolId::new(2), SymbolId::new(4)],
        );
        assert!(big.contains(SymbolId::new(4)));
        assert!(!big.contains(SymbolId::new(3)));
        assert!(small.is_subset_of(&big));
        assert!(!big.is_subset_of(&small));
    }
}
