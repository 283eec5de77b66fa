//! Symbol table for the catrefine engine.
//!
//! Symbols are opaque, densely numbered identifiers bound to a unique name
//! at load time. A handful of names are policy-significant: the orphan
//! marker and the list-structure properties. The [`SymbolTable`] records
//! which ids carry those names; nothing else about a symbol's meaning is
//! known to the engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{SymbolError, SymbolResult};

/// Dense identifier of an interned symbol, `0..N-1` in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Create a `SymbolId` from a raw `u32`.
    pub fn new(raw: u32) -> Self {
        SymbolId(raw)
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

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sym:{}", self.0)
    }
}

/// Names that mark policy-significant symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialNames {
    /// Name of the orphan marker symbol.
    #[serde(default = "default_orphan")]
    pub orphan: String,
    /// Names of the list-structure properties exempted for orphan subjects.
    #[serde(default = "default_list_structure")]
    pub list_structure: Vec<String>,
}

fn default_orphan() -> String {
    "orphan".into()
}

fn default_list_structure() -> Vec<String> {
    vec!["rdffirst".into(), "rdfrest".into(), "rdftype".into()]
}

impl Default for SpecialNames {
    fn default() -> Self {
        Self {
            orphan: default_orphan(),
            list_structure: default_list_structure(),
        }
    }
}

/// Bidirectional name ↔ id mapping with special-symbol markers.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// Forward map: id → name (source of truth).
    names: Vec<String>,
    /// Reverse map: name → id.
    by_name: HashMap<String, SymbolId>,
    capacity: usize,
    special: SpecialNames,
    orphan: Option<SymbolId>,
    list_structure: Vec<SymbolId>,
}

impl SymbolTable {
    /// Create an empty table holding at most `capacity` symbols.
    pub fn new(capacity: usize, special: SpecialNames) -> Self {
        Self {
            names: Vec::new(),
            by_name: HashMap::new(),
            capacity,
            special,
            orphan: None,
            list_structure: Vec::new(),
        }
    }

    /// Intern a name, assigning the next id if it is unseen.
    ///
    /// Re-interning a known name returns its existing id.
    pub fn intern(&mut self, name: &str) -> SymbolResult<SymbolId> {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }
        if self.names.len() >= self.capacity {
            return Err(SymbolError::CapacityExceeded {
                limit: self.capacity,
            });
        }

        let id = SymbolId(self.names.len() as u32);
        if name == self.special.orphan {
            self.orphan = Some(id);
        }
        if self.special.list_structure.iter().any(|n| n == name) {
            self.list_structure.push(id);
        }
        self.names.push(name.to_owned());
        self.by_name.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Look up a previously interned name.
    pub fn lookup(&self, name: &str) -> SymbolResult<SymbolId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SymbolError::UnknownSymbol {
                name: name.to_owned(),
            })
    }

    /// Whether `name` has been interned.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Name bound to `id`, if it was assigned by this table.
    pub fn name(&self, id: SymbolId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Resolve an id to its name, falling back to `sym:{id}`.
    pub fn resolve_name(&self, id: SymbolId) -> String {
        self.name(id)
            .map(str::to_owned)
            .unwrap_or_else(|| id.to_string())
    }

    /// All symbols in id order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (SymbolId(i as u32), n.as_str()))
    }

    /// Number of interned symbols.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no symbol has been interned.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Maximum number of symbols; also the per-component triple bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Id of the orphan marker, if interned.
    pub fn orphan(&self) -> Option<SymbolId> {
        self.orphan
    }

    /// Ids of the interned list-structure properties, in discovery order.
    pub fn list_structure(&self) -> &[SymbolId] {
        &self.list_structure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        SymbolTable::new(1024, SpecialNames::default())
    }

    #[test]
    fn intern_assigns_dense_ids_in_discovery_order() {
        let mut t = table();
        assert_eq!(t.intern("classID").unwrap().get(), 0);
        assert_eq!(t.intern("owlClass").unwrap().get(), 1);
        assert_eq!(t.intern("rdftype").unwrap().get(), 2);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn intern_is_idempotent() {
        let mut t = table();
        let a = t.intern("literal").unwrap();
        let b = t.intern("literal").unwrap();
        assert_eq!(a, b);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn lookup_unknown_name_fails() {
        let mut t = table();
        t.intern("classID").unwrap();
        let err = t.lookup("classId").unwrap_err();
        assert!(matches!(err, SymbolError::UnknownSymbol { ref name } if name == "classId"));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut t = SymbolTable::new(2, SpecialNames::default());
        t.intern("a").unwrap();
        t.intern("b").unwrap();
        // Known names are still fine at capacity.
        assert!(t.intern("a").is_ok());
        assert!(matches!(
            t.intern("c"),
            Err(SymbolError::CapacityExceeded { limit: 2 })
        ));
    }

    #[test]
    fn special_markers_are_recorded() {
        let mut t = table();
        t.intern("classID").unwrap();
        let orphan = t.intern("orphan").unwrap();
        let first = t.intern("rdffirst").unwrap();
        let rest = t.intern("rdfrest").unwrap();
        assert_eq!(t.orphan(), Some(orphan));
        assert_eq!(t.list_structure(), &[first, rest]);
    }

    #[test]
    fn custom_special_names() {
        let mut t = SymbolTable::new(
            16,
            SpecialNames {
                orphan: "loose".into(),
                list_structure: vec!["head".into()],
            },
        );
        t.intern("orphan").unwrap();
        let loose = t.intern("loose").unwrap();
        let head = t.intern("head").unwrap();
        assert_eq!(t.orphan(), Some(loose));
        assert_eq!(t.list_structure(), &[head]);
    }

    #[test]
    fn names_resolve_both_ways() {
        let mut t = table();
        let id = t.intern("dataPropID").unwrap();
        assert_eq!(t.name(id), Some("dataPropID"));
        assert_eq!(t.lookup("dataPropID").unwrap(), id);
        assert_eq!(t.resolve_name(SymbolId::new(99)), "sym:99");
    }
}
