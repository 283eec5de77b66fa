//! Sorted, read-only triple index.
//!
//! Built once from an unordered list of facts; answers membership queries
//! by binary search for the rest of the run.

use crate::error::{IndexError, IndexResult};
use crate::symbol::SymbolId;

use super::Triple;

/// Immutable sorted collection of known facts.
#[derive(Debug, Clone, Default)]
pub struct TripleIndex {
    keys: Vec<Triple>,
}

impl TripleIndex {
    /// Build the index from unordered triples.
    ///
    /// Every component must be below `component_bound`. Duplicate facts are
    /// collapsed; the number of distinct facts must not exceed `max_triples`.
    pub fn build(
        triples: impl IntoIterator<Item = Triple>,
        component_bound: usize,
        max_triples: usize,
    ) -> IndexResult<Self> {
        let mut keys = Vec::new();
        for triple in triples {
            for (position, id) in triple.components() {
                if id.index() >= component_bound {
                    return Err(IndexError::ComponentOutOfRange {
                        position,
                        value: id.get(),
                        bound: component_bound,
                    });
                }
            }
            keys.push(triple);
        }

        keys.sort_unstable();
        let before = keys.len();
        keys.dedup();
        if keys.len() < before {
            tracing::warn!(
                duplicates = before - keys.len(),
                "collapsed duplicate triples"
            );
        }

        if keys.len() > max_triples {
            return Err(IndexError::CapacityExceeded {
                count: keys.len(),
                limit: max_triples,
            });
        }

        Ok(Self { keys })
    }

    /// Whether (s, p, o) is a known fact.
    pub fn contains(&self, subject: SymbolId, property: SymbolId, object: SymbolId) -> bool {
        self.keys
            .binary_search(&Triple::new(subject, property, object))
            .is_ok()
    }

    /// Number of distinct facts.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Facts in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.keys.iter()
    }
}
