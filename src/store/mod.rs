//! Set store: the universe of canonical symbol sets.
//!
//! Every set is sorted and duplicate-free, and no two ids ever denote the
//! same content. Deduplication goes through a secondary ordered index keyed
//! by (cardinality, lexicographic content); [`set::ContentKey`] fixes that
//! ordering. Sets are never removed or mutated, so the universe only grows.

pub mod set;

use std::collections::BTreeMap;

use crate::error::{StoreError, StoreResult};
use crate::symbol::SymbolId;

pub use set::{SetId, SymbolSet};
use set::ContentKey;

/// Owner of every set created during a run.
#[derive(Debug, Clone)]
pub struct SetStore {
    /// Canonical universe in id order.
    sets: Vec<SymbolSet>,
    /// Secondary index for content lookups.
    by_content: BTreeMap<ContentKey, SetId>,
    orphan_symbol: Option<SymbolId>,
    orphan_set: Option<SetId>,
    max_sets: usize,
    degenerate_projections: u64,
}

impl SetStore {
    /// Create an empty store. `orphan_symbol` designates the singleton that
    /// becomes the orphan set once registered.
    pub fn new(orphan_symbol: Option<SymbolId>, max_sets: usize) -> Self {
        Self {
            sets: Vec::new(),
            by_content: BTreeMap::new(),
            orphan_symbol,
            orphan_set: None,
            max_sets,
            degenerate_projections: 0,
        }
    }

    /// Register a set from an arbitrary multiset of symbols.
    ///
    /// The input is sorted and deduplicated. If a set with the same content
    /// already exists its id is returned.
    pub fn register_set(
        &mut self,
        symbols: impl IntoIterator<Item = SymbolId>,
    ) -> StoreResult<SetId> {
        let mut symbols: Vec<SymbolId> = symbols.into_iter().collect();
        symbols.sort_unstable();
        symbols.dedup();
        if symbols.is_empty() {
            return Err(StoreError::EmptySet);
        }
        self.intern_canonical(symbols)
    }

    /// Intern the projection of `parent` onto the members flagged in `mask`.
    ///
    /// Returns `None` for an empty projection, which allocates nothing and
    /// bumps the degenerate projection counter. Content equality decides
    /// deduplication: projecting to an existing set's content returns that id.
    pub fn intern_subset(&mut self, parent: SetId, mask: &[bool]) -> StoreResult<Option<SetId>> {
        let parent = &self.sets[parent.index()];
        assert_eq!(
            mask.len(),
            parent.len(),
            "projection mask must cover every member of {}",
            parent.id()
        );

        // A projection of a sorted, duplicate-free set stays canonical.
        let projected: Vec<SymbolId> = parent
            .symbols()
            .iter()
            .zip(mask)
            .filter_map(|(s, &keep)| keep.then_some(*s))
            .collect();

        if projected.is_empty() {
            self.degenerate_projections += 1;
            return Ok(None);
        }
        self.intern_canonical(projected).map(Some)
    }

    fn intern_canonical(&mut self, symbols: Vec<SymbolId>) -> StoreResult<SetId> {
        let key = ContentKey(symbols);
        if let Some(&existing) = self.by_content.get(&key) {
            return Ok(existing);
        }
        if self.sets.len() >= self.max_sets {
            return Err(StoreError::CapacityExceeded {
                limit: self.max_sets,
            });
        }

        let id = SetId::new(self.sets.len() as u32);
        if self.orphan_set.is_none() && self.is_orphan_content(&key.0) {
            self.orphan_set = Some(id);
        }
        tracing::trace!(%id, size = key.0.len(), "minted set");
        self.sets.push(SymbolSet::new(id, key.0.clone()));
        self.by_content.insert(key, id);
        Ok(id)
    }

    fn is_orphan_content(&self, symbols: &[SymbolId]) -> bool {
        matches!((self.orphan_symbol, symbols), (Some(o), [only]) if *only == o)
    }

    /// Id of an existing set whose content equals `symbols` (any order).
    pub fn find(&self, symbols: &[SymbolId]) -> Option<SetId> {
        let mut canonical = symbols.to_vec();
        canonical.sort_unstable();
        canonical.dedup();
        self.by_content.get(&ContentKey(canonical)).copied()
    }

    pub fn get(&self, id: SetId) -> Option<&SymbolSet> {
        self.sets.get(id.index())
    }

    /// Number of sets in the universe.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Sets in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolSet> {
        self.sets.iter()
    }

    /// Sets in (cardinality, content) order.
    pub fn iter_by_content(&self) -> impl Iterator<Item = &SymbolSet> {
        self.by_content.values().map(|id| &self.sets[id.index()])
    }

    /// The singleton set of the orphan marker, once registered.
    pub fn orphan_set(&self) -> Option<SetId> {
        self.orphan_set
    }

    /// How many projections came out empty.
    pub fn degenerate_projections(&self) -> u64 {
        self.degenerate_projections
    }
}
